use crate::config::Overrides;
use crate::domain::model::{
    AddonStatus, Contract, CustomerRecord, InternetService, YesNo, MONTHLY_CHARGES_MAX,
    MONTHLY_CHARGES_MIN, TENURE_MAX, TENURE_MIN,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "churn-risk")]
#[command(about = "Churn-risk inspection for a single telco customer", long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Model artifact (JSON logistic pipeline)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Historical churn dataset (CSV)
    #[arg(long, global = true)]
    pub dataset: Option<String>,

    /// Probability above which a customer is flagged at risk
    #[arg(long, global = true)]
    pub threshold: Option<f64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            model_path: self.model.clone(),
            dataset_path: self.dataset.clone(),
            threshold: self.threshold,
            verbose: self.verbose,
            json_logs: self.log_json,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict churn risk for one customer entered as flags
    Predict {
        #[command(flatten)]
        form: CustomerForm,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Predict churn risk for one customer read from a JSON object
    PredictJson {
        /// File holding one JSON object keyed by field name ("-" for stdin)
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show descriptive charts over the historical dataset
    Stats,
    /// Prediction followed by the descriptive charts
    Report {
        #[command(flatten)]
        form: CustomerForm,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// 客戶資料表單；每個欄位只接受其定義域內的值
#[derive(Debug, Clone, Args)]
pub struct CustomerForm {
    /// Has dependents
    #[arg(long, value_enum)]
    pub dependents: YesNo,

    /// Months subscribed (0-72)
    #[arg(long, value_parser = clap::value_parser!(u8).range(i64::from(TENURE_MIN)..=i64::from(TENURE_MAX)))]
    pub tenure: u8,

    #[arg(long, value_enum)]
    pub online_security: AddonStatus,

    #[arg(long, value_enum)]
    pub online_backup: AddonStatus,

    #[arg(long, value_enum)]
    pub internet_service: InternetService,

    #[arg(long, value_enum)]
    pub device_protection: AddonStatus,

    #[arg(long, value_enum)]
    pub tech_support: AddonStatus,

    #[arg(long, value_enum)]
    pub contract: Contract,

    #[arg(long, value_enum)]
    pub paperless_billing: YesNo,

    /// Monthly charges (18.0-120.0)
    #[arg(long, value_parser = parse_monthly_charges)]
    pub monthly_charges: f64,
}

impl CustomerForm {
    pub fn to_record(&self) -> CustomerRecord {
        CustomerRecord {
            dependents: self.dependents,
            tenure: self.tenure,
            online_security: self.online_security,
            online_backup: self.online_backup,
            internet_service: self.internet_service,
            device_protection: self.device_protection,
            tech_support: self.tech_support,
            contract: self.contract,
            paperless_billing: self.paperless_billing,
            monthly_charges: self.monthly_charges,
        }
    }
}

fn parse_monthly_charges(value: &str) -> Result<f64, String> {
    let charges: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !charges.is_finite() || !(MONTHLY_CHARGES_MIN..=MONTHLY_CHARGES_MAX).contains(&charges) {
        return Err(format!(
            "must be between {} and {}",
            MONTHLY_CHARGES_MIN, MONTHLY_CHARGES_MAX
        ));
    }
    Ok(charges)
}
