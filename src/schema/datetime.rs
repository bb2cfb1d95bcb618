//! Datetime parsing and temporal granularity.
//!
//! Values are tried against a fixed list of common formats. Bare 4-digit
//! years only parse when the column name hints at a date, so that numeric
//! measure columns in the 1000-2999 range are not swallowed.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::dataset::Value;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// The finest meaningful time unit a datetime column supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Year,
    Month,
    Day,
    Finer,
}

impl Granularity {
    /// Aggregation buckets this granularity supports, finest first.
    /// Year-only data never yields day or month buckets.
    pub fn buckets(&self) -> &'static [TimeBucket] {
        match self {
            Granularity::Year => &[TimeBucket::Year],
            Granularity::Month => &[TimeBucket::Month, TimeBucket::Year],
            Granularity::Day | Granularity::Finer => {
                &[TimeBucket::Day, TimeBucket::Month, TimeBucket::Year]
            }
        }
    }
}

/// A calendar bucket a time series can be grouped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucket {
    Day,
    Month,
    Year,
}

impl TimeBucket {
    pub fn label(&self) -> &'static str {
        match self {
            TimeBucket::Day => "Day",
            TimeBucket::Month => "Month",
            TimeBucket::Year => "Year",
        }
    }
}

/// Parse a single value as a datetime.
///
/// `allow_bare_year` admits plain 4-digit years (1000-2999), mapped to
/// January 1st of that year.
pub fn parse_datetime(value: &Value, allow_bare_year: bool) -> Option<NaiveDateTime> {
    let text = match value {
        Value::Null | Value::Bool(_) => return None,
        Value::Int(n) => {
            if allow_bare_year && (1000..=2999).contains(n) {
                return NaiveDate::from_ymd_opt(*n as i32, 1, 1).map(|d| d.into());
            }
            return None;
        }
        Value::Float(_) => return None,
        Value::Text(s) => s.trim(),
    };
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return Some(d.into());
        }
    }
    // Month-level: 2024-03
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d") {
        if text.len() == 7 {
            return Some(d.into());
        }
    }
    if allow_bare_year {
        if let Ok(year) = text.parse::<i32>() {
            if (1000..=2999).contains(&year) {
                return NaiveDate::from_ymd_opt(year, 1, 1).map(|d| d.into());
            }
        }
    }
    None
}

/// Infer granularity from parsed values.
///
/// Any intra-day variation is Finer. Otherwise, values that all share the
/// same month and day-of-month only vary by year; values that all share the
/// same day-of-month vary by month.
pub fn infer_granularity(dates: &[NaiveDateTime]) -> Granularity {
    use chrono::Datelike;

    let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
    if dates.iter().any(|d| d.time() != midnight || d.nanosecond() != 0) {
        return Granularity::Finer;
    }
    let Some(first) = dates.first() else {
        return Granularity::Day;
    };
    let same_month_day = dates
        .iter()
        .all(|d| d.month() == first.month() && d.day() == first.day());
    if same_month_day {
        return Granularity::Year;
    }
    if dates.iter().all(|d| d.day() == first.day()) {
        return Granularity::Month;
    }
    Granularity::Day
}
