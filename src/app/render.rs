use crate::domain::model::{CustomerRecord, PredictionResult, RiskVerdict};
use crate::stats::{DatasetSummary, GroupRate};
use crate::utils::error::{ChurnError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;

const BAR_WIDTH: usize = 40;

pub fn render_review(record: &CustomerRecord) -> String {
    let mut out = String::from("Customer review\n");
    for (field, value) in record.feature_row() {
        let _ = writeln!(out, "  {:<18} {}", field, value);
    }
    out
}

pub fn render_prediction(result: &PredictionResult) -> String {
    let marker = match result.verdict {
        RiskVerdict::AtRisk => "⚠️",
        RiskVerdict::Loyal => "✅",
    };

    let mut out = String::from("Analysis result\n");
    let _ = writeln!(out, "  Churn probability: {}", result.probability_percent());
    let _ = writeln!(out, "  Status: {} {}", result.verdict.label(), marker);
    let _ = writeln!(out);
    for line in result.recommendation.lines() {
        let _ = writeln!(out, "  {}", line);
    }
    out
}

#[derive(Debug, Serialize)]
struct Assessment<'a> {
    assessed_at: DateTime<Utc>,
    customer: &'a CustomerRecord,
    probability_percent: String,
    #[serde(flatten)]
    result: &'a PredictionResult,
}

pub fn render_prediction_json(record: &CustomerRecord, result: &PredictionResult) -> Result<String> {
    let assessment = Assessment {
        assessed_at: Utc::now(),
        customer: record,
        probability_percent: result.probability_percent(),
        result,
    };
    Ok(serde_json::to_string_pretty(&assessment)?)
}

/// Per-request failures are shown, not propagated.
pub fn render_failure(err: &ChurnError) -> String {
    format!(
        "❌ {}\n   Detail: {}\n💡 {}\n",
        err.user_friendly_message(),
        err,
        err.recovery_suggestion()
    )
}

pub fn render_dataset_warning(err: &ChurnError) -> String {
    format!(
        "⚠️ Historical dataset unavailable, charts are hidden.\n   Detail: {}\n",
        err
    )
}

fn bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "·".repeat(BAR_WIDTH - filled))
}

fn render_rates(out: &mut String, title: &str, rates: &[GroupRate]) {
    let _ = writeln!(out, "{}", title);
    for rate in rates {
        let _ = writeln!(
            out,
            "  {:<16} {} {:>6.2}% ({}/{})",
            rate.group,
            bar(rate.churn_rate),
            rate.churn_rate * 100.0,
            rate.churned,
            rate.customers
        );
    }
    let _ = writeln!(out);
}

pub fn render_summary(summary: &DatasetSummary) -> String {
    let mut out = String::from("Historical churn overview\n");
    let _ = writeln!(
        out,
        "  Customers: {} (duplicates removed: {}, rows skipped: {})",
        summary.customers, summary.duplicates_removed, summary.rows_skipped
    );
    let _ = writeln!(out, "  Overall churn rate: {:.2}%", summary.churn_rate * 100.0);
    let fmt_mean = |m: Option<f64>| m.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v));
    let _ = writeln!(
        out,
        "  Mean monthly charges: churned {} / retained {}",
        fmt_mean(summary.mean_charges_churned),
        fmt_mean(summary.mean_charges_retained)
    );
    let _ = writeln!(out);

    render_rates(&mut out, "Churn rate by contract", &summary.by_contract);
    render_rates(&mut out, "Churn rate by internet service", &summary.by_internet_service);
    render_rates(&mut out, "Churn rate by tenure (months)", &summary.by_tenure_band);

    let _ = writeln!(out, "Monthly charges distribution");
    let peak = summary
        .charges_histogram
        .iter()
        .map(|b| b.count)
        .max()
        .unwrap_or(0);
    for bin in &summary.charges_histogram {
        let fraction = if peak == 0 {
            0.0
        } else {
            bin.count as f64 / peak as f64
        };
        let _ = writeln!(
            out,
            "  {:>6.1}-{:<6.1} {} {}",
            bin.lower,
            bin.upper,
            bar(fraction),
            bin.count
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AddonStatus, ChurnLabel, Contract, InternetService, YesNo};
    use crate::stats::summarize;
    use crate::dataset::HistoricalDataset;

    fn record() -> CustomerRecord {
        CustomerRecord {
            dependents: YesNo::Yes,
            tenure: 70,
            online_security: AddonStatus::Yes,
            online_backup: AddonStatus::Yes,
            internet_service: InternetService::Dsl,
            device_protection: AddonStatus::Yes,
            tech_support: AddonStatus::Yes,
            contract: Contract::TwoYear,
            paperless_billing: YesNo::No,
            monthly_charges: 25.0,
        }
    }

    fn result() -> PredictionResult {
        PredictionResult {
            probability: 0.0123,
            verdict: RiskVerdict::Loyal,
            is_at_risk: false,
            recommendation: "Recommended action:\nCustomer appears satisfied.".to_string(),
            predicted_label: ChurnLabel::Stay,
            threshold: 0.5,
        }
    }

    #[test]
    fn test_render_prediction() {
        let text = render_prediction(&result());
        assert!(text.contains("Churn probability: 1.23%"));
        assert!(text.contains("Status: LOYAL CUSTOMER"));
        assert!(text.contains("  Customer appears satisfied."));
    }

    #[test]
    fn test_render_review_lists_every_field() {
        let text = render_review(&record());
        assert!(text.contains("InternetService    DSL"));
        assert!(text.contains("MonthlyCharges     25"));
        assert_eq!(text.lines().count(), 11);
    }

    #[test]
    fn test_render_prediction_json() {
        let json = render_prediction_json(&record(), &result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["verdict"], "LOYAL");
        assert_eq!(value["probability_percent"], "1.23%");
        assert_eq!(value["customer"]["Contract"], "Two year");
        assert!(value["assessed_at"].is_string());
    }

    #[test]
    fn test_render_failure_keeps_detail() {
        let text = render_failure(&ChurnError::inference("unknown category 'Cable'"));
        assert!(text.contains("An error occurred during prediction"));
        assert!(text.contains("Detail: Inference failed: unknown category 'Cable'"));
    }

    #[test]
    fn test_render_summary_handles_empty_dataset() {
        let text = render_summary(&summarize(&HistoricalDataset::default()));
        assert!(text.contains("Customers: 0"));
        assert!(text.contains("churned n/a"));
        assert!(text.contains("Monthly charges distribution"));
    }
}
