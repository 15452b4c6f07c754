use churn_risk::app::{self, render};
use churn_risk::config::cli::{Command, OutputFormat};
use churn_risk::config::toml_config::TomlConfig;
use churn_risk::utils::error::{ChurnError, ErrorSeverity};
use churn_risk::utils::{logger, validation::Validate};
use churn_risk::{ChurnEngine, Cli, CustomerRecord, LocalArtifacts, LocalStorage, SchemaValidator, Settings};
use clap::Parser;
use std::path::Path;
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 載入 TOML 配置（可選）
    let file_config = match cli.config.as_deref().map(TomlConfig::from_file).transpose() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let settings = Settings::resolve(cli.overrides(), file_config.as_ref());

    // 初始化日誌
    if settings.json_logs {
        logger::init_json_logger(settings.verbose);
    } else {
        logger::init_cli_logger(settings.verbose);
    }
    tracing::info!("Starting churn-risk");
    tracing::debug!("Effective settings: {:?}", settings);

    // 驗證配置
    if let Some(Err(e)) = file_config.as_ref().map(Validate::validate) {
        exit_with(&e);
    }
    if let Err(e) = settings.validate() {
        exit_with(&e);
    }

    let repository = LocalArtifacts::from_config(LocalStorage::default(), &settings);

    match cli.command {
        Command::Predict { form, format } => {
            let engine = inference_or_exit(&repository, &settings).await;
            let record = form.to_record();
            print_assessment(&engine, &record, format)?;
        }
        Command::PredictJson { input, format } => {
            let engine = inference_or_exit(&repository, &settings).await;
            let json = read_input(&input).await?;
            let record = match SchemaValidator::new().validate_json(&json) {
                Ok(record) => record,
                Err(e) => exit_with(&e),
            };
            print_assessment(&engine, &record, format)?;
        }
        Command::Stats => match app::load_summary(&repository).await {
            Ok(summary) => print!("{}", render::render_summary(&summary)),
            Err(e) => print!("{}", render::render_dataset_warning(&e)),
        },
        Command::Report { form } => {
            let record = form.to_record();
            let engine = app::load_engine(&repository, settings.policy()).await;
            let summary = app::load_summary(&repository).await;
            print!("{}", app::render_report(&engine, &record, &summary));
        }
    }

    Ok(())
}

async fn inference_or_exit(
    repository: &LocalArtifacts<LocalStorage>,
    settings: &Settings,
) -> ChurnEngine {
    match app::load_engine(repository, settings.policy()).await {
        Ok(engine) => {
            tracing::info!(
                "✅ Inference ready (model '{}', threshold {})",
                engine.classifier_name(),
                engine.policy().threshold()
            );
            engine
        }
        Err(e) => exit_with(&e),
    }
}

fn print_assessment(
    engine: &ChurnEngine,
    record: &CustomerRecord,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let result = match engine.assess(record) {
        Ok(result) => result,
        Err(e) => exit_with(&e),
    };

    match format {
        OutputFormat::Text => {
            print!("{}", render::render_review(record));
            println!();
            print!("{}", render::render_prediction(&result));
        }
        OutputFormat::Json => println!("{}", render::render_prediction_json(record, &result)?),
    }
    Ok(())
}

async fn read_input(path: &Path) -> anyhow::Result<String> {
    let mut json = String::new();
    if path == Path::new("-") {
        tokio::io::stdin().read_to_string(&mut json).await?;
    } else {
        json = tokio::fs::read_to_string(path).await?;
    }
    Ok(json)
}

fn exit_with(e: &ChurnError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprint!("{}", render::render_failure(e));

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
