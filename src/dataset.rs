//! Historical churn extract used for the descriptive views.

use crate::utils::error::{ChurnError, Result};
use std::collections::HashSet;

/// One usable row of the extract.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRow {
    pub contract: String,
    pub internet_service: String,
    pub monthly_charges: f64,
    pub tenure: u32,
    pub churned: bool,
}

#[derive(Debug, Clone, Default)]
pub struct HistoricalDataset {
    pub headers: Vec<String>,
    pub rows: Vec<HistoricalRow>,
    pub duplicates_removed: usize,
    pub rows_skipped: usize,
}

impl HistoricalDataset {
    pub fn from_csv_bytes(bytes: &[u8], source: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ChurnError::artifact_load("dataset", source, e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let column = |name: &str| -> Result<usize> {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                ChurnError::artifact_load("dataset", source, format!("missing column '{}'", name))
            })
        };
        let contract_idx = column("Contract")?;
        let internet_idx = column("InternetService")?;
        let charges_idx = column("MonthlyCharges")?;
        let tenure_idx = column("tenure")?;
        let churn_idx = column("Churn")?;

        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let mut dataset = HistoricalDataset {
            headers: headers.clone(),
            ..Default::default()
        };

        for result in reader.records() {
            let record =
                result.map_err(|e| ChurnError::artifact_load("dataset", source, e.to_string()))?;
            let cells: Vec<String> = record.iter().map(str::to_string).collect();

            // 完全相同的列只保留第一筆
            if !seen.insert(cells.clone()) {
                dataset.duplicates_removed += 1;
                continue;
            }

            let parsed = parse_row(
                &cells[contract_idx],
                &cells[internet_idx],
                &cells[charges_idx],
                &cells[tenure_idx],
                &cells[churn_idx],
            );
            match parsed {
                Some(row) => dataset.rows.push(row),
                None => {
                    tracing::debug!("Skipping unparseable dataset row: {:?}", cells);
                    dataset.rows_skipped += 1;
                }
            }
        }

        tracing::info!(
            "Loaded dataset '{}': {} rows, {} duplicates removed, {} skipped",
            source,
            dataset.rows.len(),
            dataset.duplicates_removed,
            dataset.rows_skipped
        );

        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn parse_row(
    contract: &str,
    internet_service: &str,
    monthly_charges: &str,
    tenure: &str,
    churn: &str,
) -> Option<HistoricalRow> {
    let churned = match churn {
        "Yes" => true,
        "No" => false,
        _ => return None,
    };
    let monthly_charges = monthly_charges.parse::<f64>().ok().filter(|v| v.is_finite())?;
    let tenure = tenure.parse::<u32>().ok()?;
    if contract.is_empty() || internet_service.is_empty() {
        return None;
    }

    Some(HistoricalRow {
        contract: contract.to_string(),
        internet_service: internet_service.to_string(),
        monthly_charges,
        tenure,
        churned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "customerID,Contract,InternetService,MonthlyCharges,tenure,Churn\n\
        0001, Month-to-month ,Fiber optic,95.5,1,Yes\n\
        0001,Month-to-month,Fiber optic,95.5,1,Yes\n\
        0002,Two year,DSL,25.0,70,No\n\
        0003,One year,No,20.1,12, No\n\
        0004,One year,DSL,abc,12,No\n\
        0005,One year,DSL,40.0,12,Maybe\n";

    #[test]
    fn test_trims_then_deduplicates() {
        let dataset = HistoricalDataset::from_csv_bytes(SAMPLE.as_bytes(), "sample.csv").unwrap();

        assert_eq!(dataset.duplicates_removed, 1);
        assert_eq!(dataset.rows_skipped, 2);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.rows[0].contract, "Month-to-month");
        assert!(dataset.rows[0].churned);
        assert!(!dataset.rows[2].churned);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Contract,InternetService,MonthlyCharges,tenure\nOne year,DSL,20.0,3\n";
        let err = HistoricalDataset::from_csv_bytes(csv.as_bytes(), "broken.csv").unwrap_err();
        assert!(matches!(err, ChurnError::ArtifactLoad { .. }));
        assert!(err.to_string().contains("Churn"));
    }

    #[test]
    fn test_ragged_rows_fail_load() {
        let csv = "Contract,InternetService,MonthlyCharges,tenure,Churn\nOne year,DSL\n";
        assert!(HistoricalDataset::from_csv_bytes(csv.as_bytes(), "ragged.csv").is_err());
    }
}
