//! Descriptive statistics for numeric columns.
//!
//! Every statistic tolerates missing and non-finite input by operating on
//! the filtered value list. Degenerate cases (fewer than two values, zero
//! variance, zero mean) yield `None` for the affected statistic rather
//! than an error; downstream rules skip KPIs that depend on an omission.

use serde::{Deserialize, Serialize};

/// Fixed percentile ladder recorded for every numeric column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Percentiles {
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Summary statistics for one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericSummary {
    /// Count of finite, non-missing values.
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation; `None` below two values.
    pub std: Option<f64>,
    /// Sample skewness; `None` below three values or at zero variance.
    pub skewness: Option<f64>,
    /// Coefficient of variation in percent; `None` when the mean is zero
    /// or the deviation is not computable.
    pub cv_pct: Option<f64>,
    pub percentiles: Percentiles,
    pub iqr: f64,
}

/// Summarize a list of finite values. Returns `None` for an empty list.
pub fn summarize(values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let sum: f64 = sorted.iter().sum();
    let mean = sum / count as f64;
    let min = sorted[0];
    let max = sorted[count - 1];

    let std = sample_std(&sorted, mean);
    let skewness = sample_skewness(&sorted, mean);
    let cv_pct = std.and_then(|s| {
        if mean == 0.0 {
            None
        } else {
            Some((s / mean).abs() * 100.0)
        }
    });

    let percentiles = Percentiles {
        p10: percentile_sorted(&sorted, 0.10),
        p25: percentile_sorted(&sorted, 0.25),
        p50: percentile_sorted(&sorted, 0.50),
        p75: percentile_sorted(&sorted, 0.75),
        p90: percentile_sorted(&sorted, 0.90),
        p95: percentile_sorted(&sorted, 0.95),
        p99: percentile_sorted(&sorted, 0.99),
    };

    Some(NumericSummary {
        count,
        sum,
        mean,
        median: percentiles.p50,
        min,
        max,
        std,
        skewness,
        cv_pct,
        iqr: percentiles.p75 - percentiles.p25,
        percentiles,
    })
}

/// Linear-interpolation percentile over a pre-sorted slice, `q` in [0, 1].
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (n - 1) as f64).sqrt())
}

/// Fisher-Pearson skewness g1 = m3 / m2^(3/2), population moments.
fn sample_skewness(values: &[f64], mean: f64) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let m2: f64 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    if m2 == 0.0 {
        return None;
    }
    let m3: f64 = values.iter().map(|v| (v - mean).powi(3)).sum::<f64>() / n as f64;
    Some(m3 / m2.powf(1.5))
}
