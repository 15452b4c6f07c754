use crate::dataset::HistoricalDataset;
use crate::domain::model::{ChurnLabel, CustomerRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A trained binary classifier over the customer schema, consumed read-only.
pub trait ChurnClassifier: Send + Sync {
    fn name(&self) -> &str;

    fn predict(&self, record: &CustomerRecord) -> Result<ChurnLabel>;

    /// `[p(stay), p(churn)]`
    fn predict_proba(&self, record: &CustomerRecord) -> Result<[f64; 2]>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn model_path(&self) -> Option<&str>;
    fn dataset_path(&self) -> Option<&str>;
    fn threshold(&self) -> Option<f64>;
}

/// Loads the two read-only startup artifacts.
#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    async fn load_classifier(&self) -> Result<Arc<dyn ChurnClassifier>>;
    async fn load_dataset(&self) -> Result<HistoricalDataset>;
}
