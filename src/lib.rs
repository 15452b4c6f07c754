pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod dataset;
pub mod domain;
pub mod stats;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use adapters::{LocalArtifacts, LocalStorage, LogisticPipeline};
pub use config::Settings;
pub use crate::core::{engine::ChurnEngine, policy::RiskPolicy, validator::SchemaValidator};
pub use domain::model::{CustomerRecord, PredictionResult, RiskVerdict};
pub use utils::error::{ChurnError, Result};
