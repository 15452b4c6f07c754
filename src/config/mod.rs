#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::policy::RiskPolicy;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_probability, validate_required_field, Validate};
use toml_config::TomlConfig;

pub const DEFAULT_MODEL_PATH: &str = "./models/churn_prediction_model.json";
pub const DEFAULT_DATASET_PATH: &str = "./data/telco_churn_sample.csv";

/// 命令列覆蓋值；`None` 表示沿用設定檔
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model_path: Option<String>,
    pub dataset_path: Option<String>,
    pub threshold: Option<f64>,
    pub verbose: bool,
    pub json_logs: bool,
}

/// Effective settings after merging CLI flags over the optional config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub model_path: String,
    pub dataset_path: String,
    pub threshold: Option<f64>,
    pub verbose: bool,
    pub json_logs: bool,
}

impl Settings {
    pub fn resolve(overrides: Overrides, file: Option<&TomlConfig>) -> Self {
        let model_path = overrides
            .model_path
            .or_else(|| file.and_then(|f| f.model_path()).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string());
        let dataset_path = overrides
            .dataset_path
            .or_else(|| file.and_then(|f| f.dataset_path()).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_DATASET_PATH.to_string());

        Self {
            model_path,
            dataset_path,
            threshold: overrides.threshold.or_else(|| file.and_then(|f| f.threshold())),
            verbose: overrides.verbose || file.is_some_and(|f| f.verbose()),
            json_logs: overrides.json_logs || file.is_some_and(|f| f.json_logs()),
        }
    }

    /// The threshold has no built-in default; it must come from a flag or the file.
    pub fn policy(&self) -> Result<RiskPolicy> {
        let threshold = validate_required_field("policy.threshold", &self.threshold)?;
        RiskPolicy::new(*threshold)
    }
}

impl ConfigProvider for Settings {
    fn model_path(&self) -> Option<&str> {
        Some(&self.model_path)
    }

    fn dataset_path(&self) -> Option<&str> {
        Some(&self.dataset_path)
    }

    fn threshold(&self) -> Option<f64> {
        self.threshold
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("model.path", &self.model_path)?;
        validate_path("dataset.path", &self.dataset_path)?;
        if let Some(threshold) = self.threshold {
            validate_probability("policy.threshold", threshold)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ChurnError;

    #[test]
    fn test_flags_override_file() {
        let file = TomlConfig::from_toml_str(
            "[model]\npath = \"file-model.json\"\n[policy]\nthreshold = 0.55\n",
        )
        .unwrap();

        let settings = Settings::resolve(
            Overrides {
                threshold: Some(0.5),
                ..Default::default()
            },
            Some(&file),
        );

        assert_eq!(settings.model_path, "file-model.json");
        assert_eq!(settings.dataset_path, DEFAULT_DATASET_PATH);
        assert_eq!(settings.policy().unwrap().threshold(), 0.5);
    }

    #[test]
    fn test_file_threshold_used_without_flag() {
        let file = TomlConfig::from_toml_str("[policy]\nthreshold = 0.55\n").unwrap();
        let settings = Settings::resolve(Overrides::default(), Some(&file));
        assert_eq!(settings.policy().unwrap().threshold(), 0.55);
    }

    #[test]
    fn test_missing_threshold_is_an_error() {
        let settings = Settings::resolve(Overrides::default(), None);
        assert_eq!(settings.model_path, DEFAULT_MODEL_PATH);
        assert!(matches!(
            settings.policy(),
            Err(ChurnError::MissingConfig { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let settings = Settings::resolve(
            Overrides {
                threshold: Some(-0.2),
                ..Default::default()
            },
            None,
        );
        assert!(settings.validate().is_err());
    }
}
