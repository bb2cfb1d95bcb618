//! Outlier detection: Z-score and IQR, kept as two independent signals.
//!
//! The two methods are never merged into one score; both counts and rates
//! are recorded so downstream rules can choose either.

use serde::{Deserialize, Serialize};

use super::descriptive::percentile_sorted;

/// Outlier counts and rates for one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierSummary {
    pub column: String,
    /// Values with |z| at or above the threshold. Zero when the column
    /// has no computable deviation.
    pub z_count: usize,
    /// z_count over the number of non-missing values, in [0, 1].
    pub z_rate: f64,
    pub iqr_count: usize,
    pub iqr_rate: f64,
    pub iqr_lower: f64,
    pub iqr_upper: f64,
}

/// Detect outliers over the finite values of a column.
///
/// `None` when fewer than two values are available; both methods need a
/// spread to measure against.
pub fn detect(column: &str, values: &[f64], z_threshold: f64, iqr_multiplier: f64) -> Option<OutlierSummary> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mean = values.iter().sum::<f64>() / nf;
    // Population deviation, matching the classic z-score definition.
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / nf;
    let std = variance.sqrt();

    let z_count = if std == 0.0 {
        0
    } else {
        values
            .iter()
            .filter(|v| ((*v - mean) / std).abs() >= z_threshold)
            .count()
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q1 = percentile_sorted(&sorted, 0.25);
    let q3 = percentile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    let lower = q1 - iqr_multiplier * iqr;
    let upper = q3 + iqr_multiplier * iqr;
    let iqr_count = values.iter().filter(|v| **v < lower || **v > upper).count();

    Some(OutlierSummary {
        column: column.to_string(),
        z_count,
        z_rate: z_count as f64 / nf,
        iqr_count,
        iqr_rate: iqr_count as f64 / nf,
        iqr_lower: lower,
        iqr_upper: upper,
    })
}
