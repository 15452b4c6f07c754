use anyhow::Result;
use churn_risk::core::ArtifactRepository;
use churn_risk::domain::model::{AddonStatus, Contract, InternetService, YesNo};
use churn_risk::utils::error::ErrorSeverity;
use churn_risk::{app, ChurnError, CustomerRecord, LocalArtifacts, LocalStorage, RiskPolicy};
use std::path::Path;
use tempfile::TempDir;

fn fixture(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn record() -> CustomerRecord {
    CustomerRecord {
        dependents: YesNo::No,
        tenure: 1,
        online_security: AddonStatus::No,
        online_backup: AddonStatus::No,
        internet_service: InternetService::FiberOptic,
        device_protection: AddonStatus::No,
        tech_support: AddonStatus::No,
        contract: Contract::MonthToMonth,
        paperless_billing: YesNo::Yes,
        monthly_charges: 95.0,
    }
}

#[tokio::test]
async fn test_missing_model_only_disables_inference() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repository = LocalArtifacts::new(
        LocalStorage::new(temp_dir.path()),
        Some("churn_prediction_model.json".to_string()),
        Some(fixture("data/telco_churn_sample.csv")),
    );

    let engine = app::load_engine(&repository, RiskPolicy::new(0.5)).await;
    match &engine {
        Err(e @ ChurnError::ArtifactLoad { .. }) => {
            assert_eq!(e.severity(), ErrorSeverity::Critical);
            assert!(e.to_string().contains("churn_prediction_model.json"));
        }
        Err(other) => panic!("expected artifact load failure, got {:?}", other),
        Ok(_) => panic!("expected artifact load failure"),
    }

    let summary = app::load_summary(&repository).await?;
    assert_eq!(summary.customers, 60);
    assert_eq!(summary.duplicates_removed, 2);
    assert_eq!(summary.rows_skipped, 0);

    let report = app::render_report(&engine, &record(), &Ok(summary));
    assert!(report.contains("could not be loaded"));
    assert!(report.contains("Churn rate by contract"));
    assert!(!report.contains("Churn probability"));
    Ok(())
}

#[tokio::test]
async fn test_missing_dataset_hides_charts_but_keeps_prediction() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repository = LocalArtifacts::new(
        LocalStorage::new(temp_dir.path()),
        Some(fixture("models/churn_prediction_model.json")),
        Some("telco_churn.csv".to_string()),
    );

    let engine = app::load_engine(&repository, RiskPolicy::new(0.5)).await;
    assert!(engine.is_ok());

    let summary = app::load_summary(&repository).await;
    assert!(matches!(summary, Err(ChurnError::ArtifactLoad { .. })));

    let report = app::render_report(&engine, &record(), &summary);
    assert!(report.contains("Churn probability"));
    assert!(report.contains("AT RISK OF CHURN"));
    assert!(report.contains("charts are hidden"));
    assert!(!report.contains("Churn rate by contract"));
    Ok(())
}

#[tokio::test]
async fn test_corrupt_model_is_a_load_failure() -> Result<()> {
    let temp_dir = TempDir::new()?;
    tokio::fs::write(temp_dir.path().join("model.json"), r#"{"name": "broken"}"#).await?;
    tokio::fs::write(
        temp_dir.path().join("short.json"),
        r#"{"name": "short", "numeric_features": [{"feature": "tenure", "mean": 0.0, "scale": 1.0}],
            "coefficients": [0.1, 0.2], "intercept": 0.0}"#,
    )
    .await?;

    for model in ["model.json", "short.json"] {
        let repository = LocalArtifacts::new(
            LocalStorage::new(temp_dir.path()),
            Some(model.to_string()),
            None,
        );
        assert!(matches!(
            repository.load_classifier().await,
            Err(ChurnError::ArtifactLoad { .. })
        ));
        assert!(matches!(
            repository.load_dataset().await,
            Err(ChurnError::ArtifactLoad { .. })
        ));
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_threshold_disables_inference() -> Result<()> {
    let repository = LocalArtifacts::new(
        LocalStorage::new(env!("CARGO_MANIFEST_DIR")),
        Some("models/churn_prediction_model.json".to_string()),
        Some("data/telco_churn_sample.csv".to_string()),
    );
    let settings = churn_risk::Settings::resolve(Default::default(), None);

    let engine = app::load_engine(&repository, settings.policy()).await;
    assert!(matches!(engine, Err(ChurnError::MissingConfig { .. })));
    assert!(app::load_summary(&repository).await.is_ok());
    Ok(())
}
