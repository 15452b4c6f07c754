pub mod engine;
pub mod inference;
pub mod policy;
pub mod validator;

pub use crate::domain::model::{CustomerRecord, PredictionResult, RiskVerdict};
pub use crate::domain::ports::{ArtifactRepository, ChurnClassifier, ConfigProvider, Storage};
pub use crate::utils::error::Result;
