// Adapters layer: concrete implementations for external artifacts (model file, dataset, local storage).

pub mod logistic;
pub mod repository;
pub mod storage;

pub use logistic::LogisticPipeline;
pub use repository::LocalArtifacts;
pub use storage::LocalStorage;
