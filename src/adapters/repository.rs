use crate::adapters::logistic::LogisticPipeline;
use crate::core::{ArtifactRepository, ChurnClassifier, ConfigProvider, Storage};
use crate::dataset::HistoricalDataset;
use crate::utils::error::{ChurnError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Reads the model artifact and dataset through a [`Storage`] backend.
pub struct LocalArtifacts<S: Storage> {
    storage: S,
    model_path: Option<String>,
    dataset_path: Option<String>,
}

impl<S: Storage> LocalArtifacts<S> {
    pub fn new(storage: S, model_path: Option<String>, dataset_path: Option<String>) -> Self {
        Self {
            storage,
            model_path,
            dataset_path,
        }
    }

    pub fn from_config<C: ConfigProvider>(storage: S, config: &C) -> Self {
        Self::new(
            storage,
            config.model_path().map(str::to_string),
            config.dataset_path().map(str::to_string),
        )
    }

    async fn read(&self, artifact: &str, path: Option<&str>) -> Result<(String, Vec<u8>)> {
        let path = path.ok_or_else(|| ChurnError::artifact_load(artifact, "<unset>", "no path configured"))?;
        let bytes = self
            .storage
            .read_file(path)
            .await
            .map_err(|e| ChurnError::artifact_load(artifact, path, e.to_string()))?;
        Ok((path.to_string(), bytes))
    }
}

#[async_trait]
impl<S: Storage> ArtifactRepository for LocalArtifacts<S> {
    async fn load_classifier(&self) -> Result<Arc<dyn ChurnClassifier>> {
        let (path, bytes) = self.read("model artifact", self.model_path.as_deref()).await?;
        let pipeline = LogisticPipeline::from_slice(&bytes, &path)?;
        tracing::info!(
            "Loaded model '{}' from {} ({} encoded features)",
            pipeline.name,
            path,
            pipeline.width()
        );
        Ok(Arc::new(pipeline))
    }

    async fn load_dataset(&self) -> Result<HistoricalDataset> {
        let (path, bytes) = self.read("dataset", self.dataset_path.as_deref()).await?;
        HistoricalDataset::from_csv_bytes(&bytes, &path)
    }
}
