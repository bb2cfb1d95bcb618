//! Trend detection for numeric columns paired with a datetime column.
//!
//! Values are aggregated into the column's inferred time buckets, then a
//! simple least-squares line is fitted over the bucket sequence. Direction
//! reports stable when the fit's |r| falls below the significance
//! threshold.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::Granularity;

/// Fitted trend direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// A detected trend between a numeric and a datetime column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendFinding {
    pub value_column: String,
    pub time_column: String,
    pub direction: TrendDirection,
    pub slope: f64,
    pub r_squared: f64,
    /// |r| of the fit met the significance threshold.
    pub significant: bool,
    pub first_half_avg: f64,
    pub second_half_avg: f64,
    /// Percent change from the first-half to the second-half average.
    /// `None` when the first half sums to zero.
    pub change_pct: Option<f64>,
    /// Number of time buckets the fit ran over.
    pub bucket_count: usize,
}

/// Truncate a timestamp to the start of its bucket at the given
/// granularity. Finer-grained data is bucketed by day.
fn bucket_start(dt: NaiveDateTime, granularity: Granularity) -> NaiveDate {
    let date = dt.date();
    match granularity {
        Granularity::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        Granularity::Month => {
            NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
        }
        Granularity::Day | Granularity::Finer => date,
    }
}

/// Detect a trend over (timestamp, value) pairs.
///
/// `None` below three buckets; a line over fewer points says nothing.
pub fn detect(
    value_column: &str,
    time_column: &str,
    pairs: &[(NaiveDateTime, f64)],
    granularity: Granularity,
    significance_threshold: f64,
) -> Option<TrendFinding> {
    let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (dt, v) in pairs {
        *buckets.entry(bucket_start(*dt, granularity)).or_insert(0.0) += v;
    }
    if buckets.len() < 3 {
        return None;
    }
    let series: Vec<f64> = buckets.into_values().collect();

    let (slope, r) = linear_fit(&series)?;
    let significant = r.abs() >= significance_threshold;
    let direction = if !significant || slope == 0.0 {
        TrendDirection::Stable
    } else if slope > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };

    let mid = series.len() / 2;
    let first_half_avg = series[..mid].iter().sum::<f64>() / mid as f64;
    let second_half_avg = series[mid..].iter().sum::<f64>() / (series.len() - mid) as f64;
    let change_pct = if first_half_avg == 0.0 {
        None
    } else {
        Some((second_half_avg - first_half_avg) / first_half_avg.abs() * 100.0)
    };

    Some(TrendFinding {
        value_column: value_column.to_string(),
        time_column: time_column.to_string(),
        direction,
        slope,
        r_squared: r * r,
        significant,
        first_half_avg,
        second_half_avg,
        change_pct,
        bucket_count: series.len(),
    })
}

/// Least-squares fit of `ys` against their indices. Returns (slope, r).
/// `None` when the series has zero variance.
fn linear_fit(ys: &[f64]) -> Option<(f64, f64)> {
    let n = ys.len() as f64;
    let mean_x = (ys.len() - 1) as f64 / 2.0;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (i, y) in ys.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_y == 0.0 {
        // Flat series: slope zero with a perfectly insignificant fit.
        return Some((0.0, 0.0));
    }
    let slope = cov / var_x;
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    Some((slope, r))
}
