use crate::domain::model::{CustomerRecord, RiskVerdict};
use crate::utils::error::Result;
use crate::utils::validation::validate_probability;

const LOYAL_RECOMMENDATION: &str = "Recommended action:\n\
Customer appears satisfied.\n\
- Maintain current service quality.\n\
- No aggressive promotion is needed at this time.";

/// Maps a churn probability to a verdict. Strictly greater than the
/// threshold is at-risk; equal is loyal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskPolicy {
    threshold: f64,
}

impl RiskPolicy {
    pub fn new(threshold: f64) -> Result<Self> {
        validate_probability("policy.threshold", threshold)?;
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn verdict(&self, probability: f64) -> RiskVerdict {
        if probability > self.threshold {
            RiskVerdict::AtRisk
        } else {
            RiskVerdict::Loyal
        }
    }

    pub fn recommendation(&self, verdict: RiskVerdict, record: &CustomerRecord) -> String {
        match verdict {
            RiskVerdict::AtRisk => format!(
                "Recommended action:\n\
                 This customer resembles customers who ended their subscription.\n\
                 - Contact the customer immediately.\n\
                 - Offer a retention discount or a service upgrade.\n\
                 - Ask about any problems they face (especially {} users on a {} contract).",
                record.internet_service, record.contract
            ),
            RiskVerdict::Loyal => LOYAL_RECOMMENDATION.to_string(),
        }
    }

    pub fn decide(&self, probability: f64, record: &CustomerRecord) -> (RiskVerdict, String) {
        let verdict = self.verdict(probability);
        (verdict, self.recommendation(verdict, record))
    }
}
