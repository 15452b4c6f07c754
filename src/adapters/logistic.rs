//! Logistic-regression pipeline exported to JSON.
//!
//! Encoded feature vector: every numeric feature standardised as
//! `(x - mean) / scale` in declaration order, followed by one one-hot block
//! per categorical feature in declaration order.

use crate::domain::model::{fields, ChurnLabel, CustomerRecord, FeatureValue};
use crate::domain::ports::ChurnClassifier;
use crate::utils::error::{ChurnError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const DECISION_BOUNDARY: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericFeature {
    pub feature: String,
    pub mean: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalFeature {
    pub feature: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    Ignore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticPipeline {
    pub name: String,
    #[serde(default)]
    pub numeric_features: Vec<NumericFeature>,
    #[serde(default)]
    pub categorical_features: Vec<CategoricalFeature>,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticPipeline {
    /// Parses and checks an artifact; `source` only labels errors.
    pub fn from_slice(bytes: &[u8], source: &str) -> Result<Self> {
        let pipeline: Self = serde_json::from_slice(bytes).map_err(|e| {
            ChurnError::artifact_load("model artifact", source, format!("invalid JSON: {}", e))
        })?;
        pipeline
            .check()
            .map_err(|reason| ChurnError::artifact_load("model artifact", source, reason))?;
        Ok(pipeline)
    }

    pub fn width(&self) -> usize {
        self.numeric_features.len()
            + self
                .categorical_features
                .iter()
                .map(|c| c.categories.len())
                .sum::<usize>()
    }

    fn check(&self) -> std::result::Result<(), String> {
        if self.numeric_features.is_empty() && self.categorical_features.is_empty() {
            return Err("artifact declares no features".to_string());
        }

        let mut seen = HashSet::new();
        let names = self
            .numeric_features
            .iter()
            .map(|n| n.feature.as_str())
            .chain(self.categorical_features.iter().map(|c| c.feature.as_str()));
        for name in names {
            if !fields::ALL.contains(&name) {
                return Err(format!("unknown feature '{}'", name));
            }
            if !seen.insert(name) {
                return Err(format!("feature '{}' declared twice", name));
            }
        }

        for numeric in &self.numeric_features {
            if numeric.feature != fields::TENURE && numeric.feature != fields::MONTHLY_CHARGES {
                return Err(format!("feature '{}' is not numeric", numeric.feature));
            }
            if !numeric.mean.is_finite() || !numeric.scale.is_finite() || numeric.scale == 0.0 {
                return Err(format!(
                    "feature '{}' has an unusable scaler (mean={}, scale={})",
                    numeric.feature, numeric.mean, numeric.scale
                ));
            }
        }

        for categorical in &self.categorical_features {
            if categorical.feature == fields::TENURE || categorical.feature == fields::MONTHLY_CHARGES {
                return Err(format!("feature '{}' is not categorical", categorical.feature));
            }
            if categorical.categories.is_empty() {
                return Err(format!("feature '{}' has no categories", categorical.feature));
            }
        }

        if self.coefficients.len() != self.width() {
            return Err(format!(
                "expected {} coefficients, found {}",
                self.width(),
                self.coefficients.len()
            ));
        }
        if self.coefficients.iter().any(|c| !c.is_finite()) || !self.intercept.is_finite() {
            return Err("coefficients must be finite".to_string());
        }

        Ok(())
    }

    /// 將一筆記錄編碼成模型輸入向量
    pub fn encode(&self, record: &CustomerRecord) -> Result<Vec<f64>> {
        let mut encoded = Vec::with_capacity(self.width());

        for numeric in &self.numeric_features {
            match record.feature(&numeric.feature) {
                Some(FeatureValue::Numeric(value)) => {
                    encoded.push((value - numeric.mean) / numeric.scale)
                }
                _ => {
                    return Err(ChurnError::inference(format!(
                        "column '{}' is not numeric in the input row",
                        numeric.feature
                    )))
                }
            }
        }

        for categorical in &self.categorical_features {
            let Some(FeatureValue::Categorical(value)) = record.feature(&categorical.feature) else {
                return Err(ChurnError::inference(format!(
                    "column '{}' is not categorical in the input row",
                    categorical.feature
                )));
            };

            let position = categorical.categories.iter().position(|c| c == value);
            if position.is_none() && self.handle_unknown == HandleUnknown::Error {
                return Err(ChurnError::inference(format!(
                    "found unknown category '{}' in column '{}' during transform",
                    value, categorical.feature
                )));
            }
            encoded.extend((0..categorical.categories.len()).map(|i| {
                if Some(i) == position {
                    1.0
                } else {
                    0.0
                }
            }));
        }

        Ok(encoded)
    }

    fn decision_function(&self, record: &CustomerRecord) -> Result<f64> {
        let encoded = self.encode(record)?;
        Ok(self
            .coefficients
            .iter()
            .zip(&encoded)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl ChurnClassifier for LogisticPipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, record: &CustomerRecord) -> Result<ChurnLabel> {
        let [_, churn] = self.predict_proba(record)?;
        Ok(if churn >= DECISION_BOUNDARY {
            ChurnLabel::Churn
        } else {
            ChurnLabel::Stay
        })
    }

    fn predict_proba(&self, record: &CustomerRecord) -> Result<[f64; 2]> {
        let churn = sigmoid(self.decision_function(record)?);
        Ok([1.0 - churn, churn])
    }
}
