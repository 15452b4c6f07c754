use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        // 絕對路徑直接使用
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.base_path.join(candidate)
        }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        tracing::debug!("Reading {}", full_path.display());
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_relative_to_base() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("model.json"), b"{}").unwrap();

        let storage = LocalStorage::new(dir.path());
        assert_eq!(storage.read_file("model.json").await.unwrap(), b"{}");

        let absolute = dir.path().join("model.json");
        let elsewhere = LocalStorage::new("/nonexistent");
        assert_eq!(
            elsewhere.read_file(absolute.to_str().unwrap()).await.unwrap(),
            b"{}"
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(matches!(
            storage.read_file("absent.json").await,
            Err(crate::utils::error::ChurnError::Io(_))
        ));
    }
}
