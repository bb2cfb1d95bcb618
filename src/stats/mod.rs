//! Statistical analytics over a profiled dataset.
//!
//! `analyze` takes the schema-inference output and produces three things:
//! profiles enriched with descriptive summaries, cross-column
//! relationships (correlations and group comparisons), and standalone
//! findings (outliers, trends, seasonality, concentration). Everything
//! downstream feeds off the `Analysis` value; the dataset itself is not
//! touched again.

pub mod concentration;
pub mod correlation;
pub mod descriptive;
pub mod outliers;
pub mod seasonality;
pub mod trend;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::PipelineConfig;
use crate::dataset::{Column, Dataset};
use crate::schema::{self, ColumnProfile, Role};

pub use concentration::{ConcentrationFinding, RecordConcentrationFinding};
pub use correlation::CorrelationPair;
pub use descriptive::NumericSummary;
pub use outliers::OutlierSummary;
pub use seasonality::{SeasonalCycle, SeasonalityFinding};
pub use trend::{TrendDirection, TrendFinding};

/// Per-group means of a numeric column across a categorical column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupComparison {
    pub categorical: String,
    pub numeric: String,
    pub overall_mean: f64,
    /// Group means, highest first.
    pub group_means: Vec<(String, f64)>,
    pub top: (String, f64),
    pub bottom: (String, f64),
    /// Percent gap of the top group's mean over the bottom group's.
    /// `None` when the bottom mean is zero.
    pub gap_pct: Option<f64>,
}

/// A relationship observed between two columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelationshipProfile {
    Correlation(CorrelationPair),
    GroupComparison(GroupComparison),
}

/// A standalone statistical finding about the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    Outliers(OutlierSummary),
    Trend(TrendFinding),
    Seasonality(SeasonalityFinding),
    Concentration(ConcentrationFinding),
    RecordConcentration(RecordConcentrationFinding),
}

/// Full analytics output for one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub profiles: Vec<ColumnProfile>,
    pub relationships: Vec<RelationshipProfile>,
    pub findings: Vec<Finding>,
    pub row_count: usize,
}

/// Run the full analytics pass. Column order follows the dataset; pair
/// order is (earlier column, later column), so output is deterministic.
pub fn analyze(
    dataset: &Dataset,
    profiles: &[ColumnProfile],
    config: &PipelineConfig,
) -> Analysis {
    let mut enriched: Vec<ColumnProfile> = profiles.to_vec();
    for profile in &mut enriched {
        if profile.role == Role::Numeric {
            if let Some(col) = dataset.column(&profile.name) {
                profile.numeric = descriptive::summarize(&col.numeric_values());
            }
        }
    }

    let numeric: Vec<&ColumnProfile> = enriched
        .iter()
        .filter(|p| p.role == Role::Numeric)
        .collect();
    let categoricals: Vec<&ColumnProfile> = enriched
        .iter()
        .filter(|p| p.role == Role::Categorical)
        .collect();
    let datetimes: Vec<&ColumnProfile> = enriched
        .iter()
        .filter(|p| p.role == Role::Datetime)
        .collect();

    let mut relationships = Vec::new();
    let mut findings = Vec::new();

    for (i, left) in numeric.iter().enumerate() {
        for right in numeric.iter().skip(i + 1) {
            if let Some(pair) = correlate(dataset, left, right, config) {
                relationships.push(RelationshipProfile::Correlation(pair));
            }
        }
    }

    for cat in &categoricals {
        for num in &numeric {
            if let Some(cmp) = compare_groups(dataset, cat, num) {
                relationships.push(RelationshipProfile::GroupComparison(cmp));
            }
        }
    }

    for num in &numeric {
        if let Some(col) = dataset.column(&num.name) {
            if let Some(summary) = outliers::detect(
                &num.name,
                &col.numeric_values(),
                config.z_score_threshold,
                config.iqr_multiplier,
            ) {
                findings.push(Finding::Outliers(summary));
            }
        }
    }

    for dt in &datetimes {
        let granularity = match &dt.datetime {
            Some(summary) => summary.granularity,
            None => continue,
        };
        for num in &numeric {
            let pairs = time_value_pairs(dataset, &dt.name, &num.name);
            if let Some(finding) = trend::detect(
                &num.name,
                &dt.name,
                &pairs,
                granularity,
                config.trend_significance,
            ) {
                findings.push(Finding::Trend(finding));
            }
            for finding in seasonality::detect(
                &num.name,
                &dt.name,
                &pairs,
                config.seasonality_min_rows,
                config.weekly_variation_ratio,
                config.monthly_variation_ratio,
            ) {
                findings.push(Finding::Seasonality(finding));
            }
        }
    }

    for num in &numeric {
        if let Some(col) = dataset.column(&num.name) {
            if let Some(finding) = concentration::detect_records(
                &num.name,
                &col.numeric_values(),
                config.pareto_target,
            ) {
                findings.push(Finding::RecordConcentration(finding));
            }
        }
    }

    for cat in &categoricals {
        for num in &numeric {
            let totals = group_totals(dataset, &cat.name, &num.name);
            if let Some(finding) =
                concentration::detect(&cat.name, &num.name, &totals, config.pareto_target)
            {
                findings.push(Finding::Concentration(finding));
            }
        }
    }

    Analysis {
        profiles: enriched,
        relationships,
        findings,
        row_count: dataset.row_count(),
    }
}

fn correlate(
    dataset: &Dataset,
    left: &ColumnProfile,
    right: &ColumnProfile,
    config: &PipelineConfig,
) -> Option<CorrelationPair> {
    let xs = optional_numeric(dataset.column(&left.name)?);
    let ys = optional_numeric(dataset.column(&right.name)?);
    let r = correlation::pearson(&xs, &ys)?;
    if r.abs() < config.correlation_threshold {
        return None;
    }
    Some(CorrelationPair {
        left: left.name.clone(),
        right: right.name.clone(),
        r,
    })
}

fn optional_numeric(col: &Column) -> Vec<Option<f64>> {
    col.values.iter().map(|v| v.as_f64()).collect()
}

fn compare_groups(
    dataset: &Dataset,
    cat: &ColumnProfile,
    num: &ColumnProfile,
) -> Option<GroupComparison> {
    let cat_col = dataset.column(&cat.name)?;
    let num_col = dataset.column(&num.name)?;

    let mut sums: HashMap<String, (f64, usize)> = HashMap::new();
    let mut overall_sum = 0.0;
    let mut overall_count = 0usize;
    for (key, value) in cat_col.values.iter().zip(&num_col.values) {
        if key.is_missing() {
            continue;
        }
        if let Some(v) = value.as_f64() {
            let entry = sums.entry(key.render()).or_insert((0.0, 0));
            entry.0 += v;
            entry.1 += 1;
            overall_sum += v;
            overall_count += 1;
        }
    }
    if sums.len() < 2 || overall_count == 0 {
        return None;
    }

    let mut group_means: Vec<(String, f64)> = sums
        .into_iter()
        .map(|(k, (sum, count))| (k, sum / count as f64))
        .collect();
    group_means.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let top = group_means.first()?.clone();
    let bottom = group_means.last()?.clone();
    let gap_pct = if bottom.1 == 0.0 {
        None
    } else {
        Some((top.1 - bottom.1) / bottom.1.abs() * 100.0)
    };

    Some(GroupComparison {
        categorical: cat.name.clone(),
        numeric: num.name.clone(),
        overall_mean: overall_sum / overall_count as f64,
        group_means,
        top,
        bottom,
        gap_pct,
    })
}

/// Row-aligned (timestamp, value) pairs where both sides parse.
fn time_value_pairs(
    dataset: &Dataset,
    time_column: &str,
    value_column: &str,
) -> Vec<(NaiveDateTime, f64)> {
    let (Some(time_col), Some(value_col)) =
        (dataset.column(time_column), dataset.column(value_column))
    else {
        return Vec::new();
    };
    let allow_bare_year = schema::has_date_name_hint(time_column);
    time_col
        .values
        .iter()
        .zip(&value_col.values)
        .filter_map(|(t, v)| {
            let dt = schema::datetime::parse_datetime(t, allow_bare_year)?;
            Some((dt, v.as_f64()?))
        })
        .collect()
}

/// Per-group sums of a numeric column keyed by a categorical column.
fn group_totals(dataset: &Dataset, cat_column: &str, num_column: &str) -> Vec<(String, f64)> {
    let (Some(cat_col), Some(num_col)) =
        (dataset.column(cat_column), dataset.column(num_column))
    else {
        return Vec::new();
    };
    let mut sums: HashMap<String, f64> = HashMap::new();
    for (key, value) in cat_col.values.iter().zip(&num_col.values) {
        if key.is_missing() {
            continue;
        }
        if let Some(v) = value.as_f64() {
            *sums.entry(key.render()).or_insert(0.0) += v;
        }
    }
    let mut totals: Vec<(String, f64)> = sums.into_iter().collect();
    totals.sort_by(|a, b| a.0.cmp(&b.0));
    totals
}
