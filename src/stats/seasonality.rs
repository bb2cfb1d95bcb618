//! Seasonality detection over (timestamp, value) pairs.
//!
//! Values are averaged per day-of-week and per month-of-year; a cycle is
//! reported when the variance of those averages exceeds a fraction of the
//! overall mean.

use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

const WEEKDAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const MONTH_LABELS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The periodic cycle a seasonality finding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalCycle {
    DayOfWeek,
    MonthOfYear,
}

impl SeasonalCycle {
    pub fn label(&self) -> &'static str {
        match self {
            SeasonalCycle::DayOfWeek => "day of week",
            SeasonalCycle::MonthOfYear => "month of year",
        }
    }
}

/// A detected seasonal pattern in a numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalityFinding {
    pub value_column: String,
    pub time_column: String,
    pub cycle: SeasonalCycle,
    /// Period label with the highest average, e.g. "Friday" or "December".
    pub peak: String,
    pub peak_avg: f64,
    /// Period label with the lowest average.
    pub trough: String,
    pub trough_avg: f64,
    /// Average value per period in calendar order, labels included.
    pub period_averages: Vec<(String, f64)>,
}

/// Detect day-of-week and month-of-year cycles.
///
/// Skips datasets below `min_rows`; short series make the per-period
/// averages meaningless.
pub fn detect(
    value_column: &str,
    time_column: &str,
    pairs: &[(NaiveDateTime, f64)],
    min_rows: usize,
    weekly_variation_ratio: f64,
    monthly_variation_ratio: f64,
) -> Vec<SeasonalityFinding> {
    let mut findings = Vec::new();
    if pairs.len() < min_rows {
        return findings;
    }

    let weekly = period_averages(pairs, 7, |dt| weekday_index(dt.weekday()));
    if let Some(finding) = cycle_finding(
        value_column,
        time_column,
        SeasonalCycle::DayOfWeek,
        &weekly,
        &WEEKDAY_LABELS,
        weekly_variation_ratio,
    ) {
        findings.push(finding);
    }

    let monthly = period_averages(pairs, 12, |dt| dt.month0() as usize);
    if let Some(finding) = cycle_finding(
        value_column,
        time_column,
        SeasonalCycle::MonthOfYear,
        &monthly,
        &MONTH_LABELS,
        monthly_variation_ratio,
    ) {
        findings.push(finding);
    }

    findings
}

fn weekday_index(w: Weekday) -> usize {
    w.num_days_from_monday() as usize
}

/// Average value per period index; `None` for periods with no data.
fn period_averages(
    pairs: &[(NaiveDateTime, f64)],
    periods: usize,
    index_of: impl Fn(&NaiveDateTime) -> usize,
) -> Vec<Option<f64>> {
    let mut sums = vec![0.0; periods];
    let mut counts = vec![0usize; periods];
    for (dt, v) in pairs {
        let i = index_of(dt);
        sums[i] += v;
        counts[i] += 1;
    }
    sums.into_iter()
        .zip(counts)
        .map(|(s, c)| if c > 0 { Some(s / c as f64) } else { None })
        .collect()
}

fn cycle_finding(
    value_column: &str,
    time_column: &str,
    cycle: SeasonalCycle,
    averages: &[Option<f64>],
    labels: &[&'static str],
    variation_ratio: f64,
) -> Option<SeasonalityFinding> {
    let present: Vec<(usize, f64)> = averages
        .iter()
        .enumerate()
        .filter_map(|(i, avg)| avg.map(|a| (i, a)))
        .collect();
    if present.len() < 2 {
        return None;
    }

    let n = present.len() as f64;
    let mean = present.iter().map(|(_, a)| a).sum::<f64>() / n;
    let variance = present.iter().map(|(_, a)| (a - mean).powi(2)).sum::<f64>() / n;
    if variance <= mean.abs() * variation_ratio {
        return None;
    }

    // Ties go to the earlier period in calendar order.
    let (peak_i, peak_avg) = present
        .iter()
        .copied()
        .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(&a.0)))?;
    let (trough_i, trough_avg) = present
        .iter()
        .copied()
        .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))?;

    Some(SeasonalityFinding {
        value_column: value_column.to_string(),
        time_column: time_column.to_string(),
        cycle,
        peak: labels[peak_i].to_string(),
        peak_avg,
        trough: labels[trough_i].to_string(),
        trough_avg,
        period_averages: present
            .into_iter()
            .map(|(i, a)| (labels[i].to_string(), a))
            .collect(),
    })
}
