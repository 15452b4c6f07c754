//! Presentation layer: wires artifacts into the engine and renders each
//! feature area independently.

pub mod render;

use crate::core::engine::ChurnEngine;
use crate::core::policy::RiskPolicy;
use crate::core::ArtifactRepository;
use crate::domain::model::CustomerRecord;
use crate::stats::{summarize, DatasetSummary};
use crate::utils::error::Result;

/// Loads the classifier once and injects it into a new engine.
pub async fn load_engine<R>(repository: &R, policy: Result<RiskPolicy>) -> Result<ChurnEngine>
where
    R: ArtifactRepository + ?Sized,
{
    let policy = policy?;
    let classifier = repository.load_classifier().await.inspect_err(|e| {
        tracing::error!("Inference unavailable: {}", e);
    })?;
    Ok(ChurnEngine::new(classifier, policy))
}

pub async fn load_summary<R>(repository: &R) -> Result<DatasetSummary>
where
    R: ArtifactRepository + ?Sized,
{
    let dataset = repository.load_dataset().await.inspect_err(|e| {
        tracing::warn!("Descriptive views unavailable: {}", e);
    })?;
    Ok(summarize(&dataset))
}

/// 預測區塊與統計區塊各自降級，互不影響
pub fn render_report(
    engine: &Result<ChurnEngine>,
    record: &CustomerRecord,
    summary: &Result<DatasetSummary>,
) -> String {
    let mut out = render::render_review(record);
    out.push('\n');

    match engine {
        Ok(engine) => match engine.assess(record) {
            Ok(result) => out.push_str(&render::render_prediction(&result)),
            Err(e) => out.push_str(&render::render_failure(&e)),
        },
        Err(e) => out.push_str(&render::render_failure(e)),
    }
    out.push('\n');

    match summary {
        Ok(summary) => out.push_str(&render::render_summary(summary)),
        Err(e) => out.push_str(&render::render_dataset_warning(e)),
    }
    out
}
