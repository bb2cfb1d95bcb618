//! Data quality assessment.
//!
//! Scores five dimensions in [0, 1] and combines them into a weighted
//! overall score. Low dimensions produce human-readable issues and
//! recommendations alongside the numbers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::PipelineConfig;
use crate::dataset::Dataset;
use crate::schema::{self, ColumnProfile, Role};
use crate::stats;

const WEIGHT_COMPLETENESS: f64 = 0.25;
const WEIGHT_UNIQUENESS: f64 = 0.15;
const WEIGHT_CONSISTENCY: f64 = 0.20;
const WEIGHT_VALIDITY: f64 = 0.20;
const WEIGHT_ACCURACY: f64 = 0.20;

/// Missing-value share above which a column is called out.
const MISSING_ISSUE_THRESHOLD: f64 = 0.2;

/// Plausible year range for datetime validity.
const MIN_VALID_YEAR: i32 = 1900;
const MAX_VALID_YEAR: i32 = 2100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Share of cells that are present.
    pub completeness: f64,
    /// Share of rows that are not exact duplicates.
    pub uniqueness: f64,
    /// Share of values conforming to their column's inferred role.
    pub consistency: f64,
    /// Share of values inside plausible bounds for their role.
    pub validity: f64,
    /// One minus the average extreme-outlier rate of numeric columns.
    pub accuracy: f64,
    /// Weighted combination of the five dimensions.
    pub overall: f64,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Score the dataset against its inferred profiles.
pub fn assess(
    dataset: &Dataset,
    profiles: &[ColumnProfile],
    config: &PipelineConfig,
) -> QualityReport {
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    let completeness = completeness_score(profiles, &mut issues, &mut recommendations);
    let uniqueness = uniqueness_score(dataset, profiles, &mut issues, &mut recommendations);
    let consistency = consistency_score(dataset, profiles, &mut issues);
    let validity = validity_score(dataset, profiles, &mut issues);
    let accuracy = accuracy_score(dataset, profiles, config, &mut issues, &mut recommendations);

    let overall = completeness * WEIGHT_COMPLETENESS
        + uniqueness * WEIGHT_UNIQUENESS
        + consistency * WEIGHT_CONSISTENCY
        + validity * WEIGHT_VALIDITY
        + accuracy * WEIGHT_ACCURACY;

    QualityReport {
        completeness,
        uniqueness,
        consistency,
        validity,
        accuracy,
        overall,
        issues,
        recommendations,
    }
}

fn completeness_score(
    profiles: &[ColumnProfile],
    issues: &mut Vec<String>,
    recommendations: &mut Vec<String>,
) -> f64 {
    if profiles.is_empty() {
        return 1.0;
    }
    let mut total = 0.0;
    for profile in profiles {
        total += profile.missing_ratio;
        if profile.missing_ratio > MISSING_ISSUE_THRESHOLD {
            issues.push(format!(
                "Column '{}' is {:.0}% missing",
                profile.name,
                profile.missing_ratio * 100.0
            ));
            recommendations.push(format!(
                "Backfill or drop column '{}' before relying on its KPIs",
                profile.name
            ));
        }
    }
    1.0 - total / profiles.len() as f64
}

fn uniqueness_score(
    dataset: &Dataset,
    profiles: &[ColumnProfile],
    issues: &mut Vec<String>,
    recommendations: &mut Vec<String>,
) -> f64 {
    let rows = dataset.row_count();
    let mut seen: HashMap<String, usize> = HashMap::new();
    for i in 0..rows {
        let mut key = String::new();
        for col in dataset.columns() {
            key.push_str(&col.values[i].render());
            key.push('\u{1f}');
        }
        *seen.entry(key).or_insert(0) += 1;
    }
    let duplicates = rows - seen.len();
    if duplicates > 0 {
        issues.push(format!("{duplicates} exact duplicate rows"));
        recommendations.push("Deduplicate rows before aggregating".to_string());
    }

    for profile in profiles.iter().filter(|p| p.role == Role::Identifier) {
        if profile.cardinality < rows {
            issues.push(format!(
                "Identifier column '{}' repeats values",
                profile.name
            ));
        }
    }

    1.0 - duplicates as f64 / rows as f64
}

/// Share of non-missing values parseable as the column's inferred role.
/// Text and categorical columns always conform.
fn consistency_score(
    dataset: &Dataset,
    profiles: &[ColumnProfile],
    issues: &mut Vec<String>,
) -> f64 {
    let mut scores = Vec::new();
    for profile in profiles {
        let col = match dataset.column(&profile.name) {
            Some(c) => c,
            None => continue,
        };
        let non_missing = col.non_missing();
        if non_missing == 0 {
            continue;
        }
        let conforming = match profile.role {
            Role::Numeric => col.numeric_values().len(),
            Role::Datetime => {
                let allow_bare_year = schema::has_date_name_hint(&profile.name);
                schema::parse_column(col, allow_bare_year).len()
            }
            _ => non_missing,
        };
        let score = conforming as f64 / non_missing as f64;
        if score < 1.0 {
            issues.push(format!(
                "Column '{}' has {} values that do not fit its {} role",
                profile.name,
                non_missing - conforming,
                profile.role.as_str()
            ));
        }
        scores.push(score);
    }
    average_or_one(&scores)
}

/// Numeric values must be finite; datetimes must land in a plausible
/// year range.
fn validity_score(
    dataset: &Dataset,
    profiles: &[ColumnProfile],
    issues: &mut Vec<String>,
) -> f64 {
    use chrono::Datelike;

    let mut scores = Vec::new();
    for profile in profiles {
        let col = match dataset.column(&profile.name) {
            Some(c) => c,
            None => continue,
        };
        match profile.role {
            Role::Numeric => {
                let values = col.numeric_values();
                if values.is_empty() {
                    continue;
                }
                // as_f64 already rejects non-finite parses.
                scores.push(1.0);
            }
            Role::Datetime => {
                let allow_bare_year = schema::has_date_name_hint(&profile.name);
                let parsed = schema::parse_column(col, allow_bare_year);
                if parsed.is_empty() {
                    continue;
                }
                let in_range = parsed
                    .iter()
                    .filter(|dt| (MIN_VALID_YEAR..=MAX_VALID_YEAR).contains(&dt.year()))
                    .count();
                let score = in_range as f64 / parsed.len() as f64;
                if score < 1.0 {
                    issues.push(format!(
                        "Column '{}' has dates outside {MIN_VALID_YEAR}-{MAX_VALID_YEAR}",
                        profile.name
                    ));
                }
                scores.push(score);
            }
            _ => {}
        }
    }
    average_or_one(&scores)
}

fn accuracy_score(
    dataset: &Dataset,
    profiles: &[ColumnProfile],
    config: &PipelineConfig,
    issues: &mut Vec<String>,
    recommendations: &mut Vec<String>,
) -> f64 {
    let mut rates = Vec::new();
    for profile in profiles.iter().filter(|p| p.role == Role::Numeric) {
        let col = match dataset.column(&profile.name) {
            Some(c) => c,
            None => continue,
        };
        let summary = stats::outliers::detect(
            &profile.name,
            &col.numeric_values(),
            config.z_score_threshold,
            config.iqr_multiplier,
        );
        if let Some(summary) = summary {
            if summary.z_count > 0 {
                issues.push(format!(
                    "Column '{}' has {} extreme values",
                    profile.name, summary.z_count
                ));
                recommendations.push(format!(
                    "Review the extreme values in '{}' for entry errors",
                    profile.name
                ));
            }
            rates.push(summary.z_rate);
        }
    }
    1.0 - rates.iter().sum::<f64>() / rates.len().max(1) as f64
}

fn average_or_one(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        1.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}
