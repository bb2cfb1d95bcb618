//! Pareto-style concentration analysis: over the individual records of a
//! numeric column, and over its per-group totals when a categorical
//! column is available.

use serde::{Deserialize, Serialize};

/// How concentrated a numeric column's total is across individual records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConcentrationFinding {
    pub column: String,
    /// Smallest fraction of records (largest first) whose combined share
    /// reaches the target share of the total.
    pub pareto_fraction: f64,
    /// The share actually reached by that leading fraction.
    pub reached_share: f64,
    /// Number of records contributing to the leading fraction.
    pub top_record_count: usize,
    pub record_count: usize,
}

/// Compute the Pareto fraction over individual record values.
///
/// Values are sorted descending; the fraction is the minimum leading
/// share of records whose sum reaches `target` of the total. One record
/// holding everything in `n` yields exactly `1/n`. `None` below two
/// records or when the total is not positive.
pub fn detect_records(
    column: &str,
    values: &[f64],
    target: f64,
) -> Option<RecordConcentrationFinding> {
    if values.len() < 2 {
        return None;
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut running = 0.0;
    let mut top_record_count = sorted.len();
    for (i, v) in sorted.iter().enumerate() {
        running += v;
        if running >= total * target {
            top_record_count = i + 1;
            break;
        }
    }
    let reached: f64 = sorted[..top_record_count].iter().sum();

    Some(RecordConcentrationFinding {
        column: column.to_string(),
        pareto_fraction: top_record_count as f64 / sorted.len() as f64,
        reached_share: reached / total,
        top_record_count,
        record_count: sorted.len(),
    })
}

/// How concentrated a measure is across the groups of a categorical column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcentrationFinding {
    pub categorical: String,
    pub numeric: String,
    /// Smallest fraction of groups (largest first) whose combined share
    /// reaches the target share of the total.
    pub pareto_fraction: f64,
    /// The share actually reached by that leading fraction.
    pub reached_share: f64,
    /// Number of groups contributing to the leading fraction.
    pub top_group_count: usize,
    pub group_count: usize,
    /// Leading groups by total, largest first.
    pub top_groups: Vec<(String, f64)>,
}

/// Compute the Pareto fraction for per-group totals.
///
/// Groups are sorted descending by total; the fraction is the minimum
/// leading share of groups whose sum reaches `target` (e.g. 0.8) of the
/// grand total. A single dominant group in `n` yields `1/n`. `None` when
/// there are fewer than two groups or the grand total is not positive.
pub fn detect(
    categorical: &str,
    numeric: &str,
    group_totals: &[(String, f64)],
    target: f64,
) -> Option<ConcentrationFinding> {
    if group_totals.len() < 2 {
        return None;
    }
    let grand_total: f64 = group_totals.iter().map(|(_, v)| v).sum();
    if grand_total <= 0.0 {
        return None;
    }

    let mut sorted: Vec<(String, f64)> = group_totals.to_vec();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut running = 0.0;
    let mut top_group_count = sorted.len();
    for (i, (_, v)) in sorted.iter().enumerate() {
        running += v;
        if running >= grand_total * target {
            top_group_count = i + 1;
            break;
        }
    }
    let reached: f64 = sorted[..top_group_count].iter().map(|(_, v)| v).sum();

    Some(ConcentrationFinding {
        categorical: categorical.to_string(),
        numeric: numeric.to_string(),
        pareto_fraction: top_group_count as f64 / sorted.len() as f64,
        reached_share: reached / grand_total,
        top_group_count,
        group_count: sorted.len(),
        top_groups: sorted.into_iter().take(top_group_count).collect(),
    })
}
