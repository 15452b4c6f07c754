//! Descriptive statistics over the deduplicated historical dataset.

use crate::dataset::{HistoricalDataset, HistoricalRow};
use crate::domain::model::{MONTHLY_CHARGES_MAX, MONTHLY_CHARGES_MIN};
use serde::Serialize;
use std::collections::BTreeMap;

pub const CHARGE_BINS: usize = 10;
const TENURE_BAND_WIDTH: u32 = 12;
const TENURE_BANDS: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRate {
    pub group: String,
    pub customers: usize,
    pub churned: usize,
    pub churn_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub customers: usize,
    pub duplicates_removed: usize,
    pub rows_skipped: usize,
    pub churn_rate: f64,
    pub by_contract: Vec<GroupRate>,
    pub by_internet_service: Vec<GroupRate>,
    pub mean_charges_churned: Option<f64>,
    pub mean_charges_retained: Option<f64>,
    pub charges_histogram: Vec<HistogramBin>,
    pub by_tenure_band: Vec<GroupRate>,
}

pub fn summarize(dataset: &HistoricalDataset) -> DatasetSummary {
    let rows = &dataset.rows;
    let churned = rows.iter().filter(|r| r.churned).count();

    DatasetSummary {
        customers: rows.len(),
        duplicates_removed: dataset.duplicates_removed,
        rows_skipped: dataset.rows_skipped,
        churn_rate: rate(churned, rows.len()),
        by_contract: group_rates(rows, |r| r.contract.clone()),
        by_internet_service: group_rates(rows, |r| r.internet_service.clone()),
        mean_charges_churned: mean(rows.iter().filter(|r| r.churned).map(|r| r.monthly_charges)),
        mean_charges_retained: mean(rows.iter().filter(|r| !r.churned).map(|r| r.monthly_charges)),
        charges_histogram: charges_histogram(rows),
        by_tenure_band: tenure_bands(rows),
    }
}

fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

pub fn group_rates<F>(rows: &[HistoricalRow], key: F) -> Vec<GroupRate>
where
    F: Fn(&HistoricalRow) -> String,
{
    let mut groups: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(key(row)).or_default();
        entry.0 += 1;
        if row.churned {
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(group, (customers, churned))| GroupRate {
            group,
            customers,
            churned,
            churn_rate: rate(churned, customers),
        })
        .collect()
}

fn charges_histogram(rows: &[HistoricalRow]) -> Vec<HistogramBin> {
    let width = (MONTHLY_CHARGES_MAX - MONTHLY_CHARGES_MIN) / CHARGE_BINS as f64;
    let mut bins: Vec<HistogramBin> = (0..CHARGE_BINS)
        .map(|i| HistogramBin {
            lower: MONTHLY_CHARGES_MIN + width * i as f64,
            upper: MONTHLY_CHARGES_MIN + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for row in rows {
        // 超出範圍的值歸入最外側的區間
        let offset = ((row.monthly_charges - MONTHLY_CHARGES_MIN) / width).floor();
        let index = if offset < 0.0 {
            0
        } else {
            (offset as usize).min(CHARGE_BINS - 1)
        };
        bins[index].count += 1;
    }

    bins
}

fn tenure_band(tenure: u32) -> usize {
    if tenure == 0 {
        return 0;
    }
    (((tenure - 1) / TENURE_BAND_WIDTH) as usize).min(TENURE_BANDS - 1)
}

fn tenure_bands(rows: &[HistoricalRow]) -> Vec<GroupRate> {
    let mut counts = [(0usize, 0usize); TENURE_BANDS];
    for row in rows {
        let band = &mut counts[tenure_band(row.tenure)];
        band.0 += 1;
        if row.churned {
            band.1 += 1;
        }
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &(customers, churned))| {
            let lower = if i == 0 { 0 } else { i as u32 * TENURE_BAND_WIDTH + 1 };
            let upper = (i as u32 + 1) * TENURE_BAND_WIDTH;
            GroupRate {
                group: format!("{}-{}", lower, upper),
                customers,
                churned,
                churn_rate: rate(churned, customers),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(contract: &str, internet: &str, charges: f64, tenure: u32, churned: bool) -> HistoricalRow {
        HistoricalRow {
            contract: contract.into(),
            internet_service: internet.into(),
            monthly_charges: charges,
            tenure,
            churned,
        }
    }

    fn dataset() -> HistoricalDataset {
        HistoricalDataset {
            headers: vec![],
            rows: vec![
                row("Month-to-month", "Fiber optic", 95.0, 1, true),
                row("Month-to-month", "Fiber optic", 85.0, 5, true),
                row("Month-to-month", "DSL", 45.0, 13, false),
                row("Two year", "DSL", 25.0, 70, false),
                row("One year", "No", 19.0, 80, false),
            ],
            duplicates_removed: 2,
            rows_skipped: 1,
        }
    }

    #[test]
    fn test_overall_and_grouped_rates() {
        let summary = summarize(&dataset());

        assert_eq!(summary.customers, 5);
        assert_eq!(summary.duplicates_removed, 2);
        assert!((summary.churn_rate - 0.4).abs() < 1e-12);

        let m2m = summary
            .by_contract
            .iter()
            .find(|g| g.group == "Month-to-month")
            .unwrap();
        assert_eq!((m2m.customers, m2m.churned), (3, 2));

        let groups: Vec<&str> = summary
            .by_internet_service
            .iter()
            .map(|g| g.group.as_str())
            .collect();
        assert_eq!(groups, vec!["DSL", "Fiber optic", "No"]);
    }

    #[test]
    fn test_mean_charges_by_class() {
        let summary = summarize(&dataset());
        assert_eq!(summary.mean_charges_churned, Some(90.0));
        assert_eq!(summary.mean_charges_retained, Some(29.666666666666668));

        let empty = summarize(&HistoricalDataset::default());
        assert_eq!(empty.mean_charges_churned, None);
        assert_eq!(empty.churn_rate, 0.0);
    }

    #[test]
    fn test_histogram_covers_every_row() {
        let mut data = dataset();
        data.rows.push(row("One year", "DSL", 150.0, 3, false));
        data.rows.push(row("One year", "DSL", 10.0, 3, false));

        let histogram = summarize(&data).charges_histogram;
        assert_eq!(histogram.len(), CHARGE_BINS);
        assert_eq!(histogram[0].lower, 18.0);
        assert!((histogram[CHARGE_BINS - 1].upper - 120.0).abs() < 1e-9);
        assert_eq!(histogram.iter().map(|b| b.count).sum::<usize>(), 7);
        assert_eq!(histogram[0].count, 3);
        assert_eq!(histogram[CHARGE_BINS - 1].count, 1);
    }

    #[test]
    fn test_tenure_bands() {
        assert_eq!(tenure_band(0), 0);
        assert_eq!(tenure_band(12), 0);
        assert_eq!(tenure_band(13), 1);
        assert_eq!(tenure_band(72), 5);
        assert_eq!(tenure_band(80), 5);

        let bands = summarize(&dataset()).by_tenure_band;
        assert_eq!(bands[0].group, "0-12");
        assert_eq!(bands[1].group, "13-24");
        assert_eq!(bands[5].group, "61-72");
        assert_eq!((bands[0].customers, bands[0].churned), (2, 2));
        assert_eq!(bands[5].customers, 2);
    }
}
