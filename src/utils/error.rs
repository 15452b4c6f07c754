use std::fmt;
use thiserror::Error;

/// 單一欄位的驗證問題
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub reason: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// 一次驗證收集到的所有欄位問題
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationFailure {
    pub issues: Vec<FieldIssue>,
}

impl ValidationFailure {
    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.issues.push(FieldIssue::new(field, reason));
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// 出錯的欄位名稱，依發現順序
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }

    pub fn mentions(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ChurnError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.issues.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Error, Debug)]
pub enum ChurnError {
    #[error("Failed to load {artifact} from '{path}': {reason}")]
    ArtifactLoad {
        artifact: String,
        path: String,
        reason: String,
    },

    #[error("Invalid customer record: {0}")]
    Validation(ValidationFailure),

    #[error("Inference failed: {message}")]
    Inference { message: String },

    #[error("Configuration error in '{field}': {message}")]
    Config { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Artifact,
    Input,
    Inference,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ChurnError {
    pub fn artifact_load(
        artifact: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ArtifactLoad {
            artifact: artifact.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ArtifactLoad { .. } => ErrorCategory::Artifact,
            Self::Validation(_) => ErrorCategory::Input,
            Self::Inference { .. } => ErrorCategory::Inference,
            Self::Config { .. } | Self::InvalidConfigValue { .. } | Self::MissingConfig { .. } => {
                ErrorCategory::Configuration
            }
            Self::Io(_) | Self::Csv(_) | Self::Serialization(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單次請求失敗，下一次仍可重試
            Self::Validation(_) | Self::Inference { .. } => ErrorSeverity::Medium,
            Self::Config { .. } | Self::InvalidConfigValue { .. } | Self::MissingConfig { .. } => {
                ErrorSeverity::High
            }
            Self::ArtifactLoad { .. } | Self::Io(_) | Self::Csv(_) | Self::Serialization(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ArtifactLoad { artifact, path, .. } => format!(
                "Check that the {} exists at '{}' and was exported in the expected format",
                artifact, path
            ),
            Self::Validation(failure) => format!(
                "Correct the following field(s) and try again: {}",
                failure.fields().join(", ")
            ),
            Self::Inference { .. } => {
                "Verify that the model artifact was trained on the same field names and categories"
                    .to_string()
            }
            Self::Config { field, .. } | Self::InvalidConfigValue { field, .. } => {
                format!("Fix the '{}' setting in the config file or CLI flags", field)
            }
            Self::MissingConfig { field } => {
                format!("Provide '{}' via the config file or the matching CLI flag", field)
            }
            Self::Io(_) => "Check file paths and permissions".to_string(),
            Self::Csv(_) => "Check that the dataset is a well-formed CSV with a header row".to_string(),
            Self::Serialization(_) => "Check that the JSON input is well-formed".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ArtifactLoad { artifact, .. } => format!("The {} could not be loaded: {}", artifact, self),
            Self::Validation(failure) => format!("Customer data is invalid ({})", failure),
            Self::Inference { message } => format!("An error occurred during prediction: {}", message),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChurnError>;
