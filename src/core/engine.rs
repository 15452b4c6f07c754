use crate::core::inference::InferenceInvoker;
use crate::core::policy::RiskPolicy;
use crate::core::validator::SchemaValidator;
use crate::domain::model::{CustomerRecord, PredictionResult, RiskVerdict};
use crate::domain::ports::ChurnClassifier;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Validate → infer → threshold, one record per call.
#[derive(Clone)]
pub struct ChurnEngine {
    validator: SchemaValidator,
    invoker: InferenceInvoker,
    policy: RiskPolicy,
}

impl ChurnEngine {
    pub fn new(classifier: Arc<dyn ChurnClassifier>, policy: RiskPolicy) -> Self {
        Self {
            validator: SchemaValidator::new(),
            invoker: InferenceInvoker::new(classifier),
            policy,
        }
    }

    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    pub fn classifier_name(&self) -> &str {
        self.invoker.classifier_name()
    }

    pub fn assess(&self, record: &CustomerRecord) -> Result<PredictionResult> {
        // 直接在程式中組出的記錄也要先檢查範圍
        record.validate()?;

        let inference = self.invoker.infer(record)?;
        let (verdict, recommendation) = self.policy.decide(inference.probability, record);

        tracing::info!(
            "Assessed customer: p(churn)={:.4}, threshold={}, verdict={:?}",
            inference.probability,
            self.policy.threshold(),
            verdict
        );

        Ok(PredictionResult {
            probability: inference.probability,
            verdict,
            is_at_risk: verdict == RiskVerdict::AtRisk,
            recommendation,
            predicted_label: inference.label,
            threshold: self.policy.threshold(),
        })
    }

    pub fn assess_raw(&self, raw: &HashMap<String, Value>) -> Result<PredictionResult> {
        let record = self.validator.validate_fields(raw).inspect_err(|e| {
            tracing::warn!("Rejected customer record: {}", e);
        })?;
        self.assess(&record)
    }

    pub fn assess_json(&self, json: &str) -> Result<PredictionResult> {
        let record = self.validator.validate_json(json).inspect_err(|e| {
            tracing::warn!("Rejected customer record: {}", e);
        })?;
        self.assess(&record)
    }
}
