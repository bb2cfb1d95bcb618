//! Schema inference: classify every column into one of five roles.
//!
//! Inference is total and never fails; a column that matches nothing falls
//! back to the text role. Priority is fixed: identifier > datetime >
//! categorical > numeric > text. Column-name hints strengthen a
//! classification but never force a role the values reject.

pub mod datetime;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::PipelineConfig;
use crate::dataset::{Column, Dataset};
use crate::stats::descriptive::NumericSummary;
pub use datetime::{Granularity, TimeBucket};

static ID_VALUE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^-?\d+$",
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
        r"^[A-Za-z]{1,8}[-_]?\d{1,12}$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static ID_NAME_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|_)id($|_)|_key$|^key$|uuid|^pk$|_pk$|serial").unwrap());

static DATE_NAME_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"date|time|timestamp|created|updated|modified|_at$|_dt$|year|month|day|when")
        .unwrap()
});

/// The inferred semantic category of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Identifier,
    Datetime,
    Categorical,
    Numeric,
    Text,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Identifier => "identifier",
            Role::Datetime => "datetime",
            Role::Categorical => "categorical",
            Role::Numeric => "numeric",
            Role::Text => "text",
        }
    }
}

/// Datetime-role summary: observed range and inferred granularity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatetimeSummary {
    pub min: chrono::NaiveDateTime,
    pub max: chrono::NaiveDateTime,
    pub granularity: Granularity,
}

/// Categorical-role summary: top-k value frequencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub top_values: Vec<(String, usize)>,
}

/// Per-column inference output.
///
/// Created once by schema inference and read-only afterward. The analytics
/// stage attaches `numeric` summaries by producing a new profile list; it
/// never mutates an existing one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub role: Role,
    pub cardinality: usize,
    pub missing_ratio: f64,
    pub numeric: Option<NumericSummary>,
    pub datetime: Option<DatetimeSummary>,
    pub categorical: Option<CategoricalSummary>,
}

impl ColumnProfile {
    fn bare(name: &str, role: Role, cardinality: usize, missing_ratio: f64) -> Self {
        Self {
            name: name.to_string(),
            role,
            cardinality,
            missing_ratio,
            numeric: None,
            datetime: None,
            categorical: None,
        }
    }
}

/// Classify every column of the dataset. Total; never fails.
pub fn infer(dataset: &Dataset, config: &PipelineConfig) -> Vec<ColumnProfile> {
    dataset
        .columns()
        .iter()
        .map(|col| profile_column(col, dataset.row_count(), config))
        .collect()
}

fn profile_column(col: &Column, row_count: usize, config: &PipelineConfig) -> ColumnProfile {
    let cardinality = col.cardinality();
    let missing_ratio = col.missing_ratio();
    let non_missing = col.non_missing();

    // A column with zero usable values classifies as text.
    if non_missing == 0 {
        return ColumnProfile::bare(&col.name, Role::Text, cardinality, missing_ratio);
    }

    let name_lower = col.name.to_lowercase();

    if looks_like_identifier(col, cardinality, row_count, &name_lower, config) {
        return ColumnProfile::bare(&col.name, Role::Identifier, cardinality, missing_ratio);
    }

    if let Some(summary) = datetime_summary(col, non_missing, &name_lower, config) {
        let mut profile =
            ColumnProfile::bare(&col.name, Role::Datetime, cardinality, missing_ratio);
        profile.datetime = Some(summary);
        return profile;
    }

    let numeric_coverage = col.numeric_coverage();
    let purely_numeric = numeric_coverage >= 0.99;

    let low_cardinality = cardinality <= config.categorical_max_cardinality
        || (cardinality as f64 / row_count as f64) <= config.categorical_max_ratio;
    if low_cardinality && !purely_numeric {
        let mut profile =
            ColumnProfile::bare(&col.name, Role::Categorical, cardinality, missing_ratio);
        profile.categorical = Some(categorical_summary(col, config.top_k_values));
        return profile;
    }

    if numeric_coverage >= config.numeric_parse_coverage {
        return ColumnProfile::bare(&col.name, Role::Numeric, cardinality, missing_ratio);
    }

    ColumnProfile::bare(&col.name, Role::Text, cardinality, missing_ratio)
}

fn looks_like_identifier(
    col: &Column,
    cardinality: usize,
    row_count: usize,
    name_lower: &str,
    config: &PipelineConfig,
) -> bool {
    let unique_ratio = cardinality as f64 / row_count as f64;
    if unique_ratio < config.identifier_unique_ratio {
        return false;
    }
    let mut matched = 0usize;
    let mut total = 0usize;
    for v in &col.values {
        if v.is_missing() {
            continue;
        }
        total += 1;
        let rendered = v.render();
        if ID_VALUE_PATTERNS.iter().any(|re| re.is_match(&rendered)) {
            matched += 1;
        }
    }
    if total == 0 {
        return false;
    }
    let pattern_coverage = matched as f64 / total as f64;
    pattern_coverage >= config.identifier_pattern_coverage || ID_NAME_HINT.is_match(name_lower)
}

fn datetime_summary(
    col: &Column,
    non_missing: usize,
    name_lower: &str,
    config: &PipelineConfig,
) -> Option<DatetimeSummary> {
    let allow_bare_year = DATE_NAME_HINT.is_match(name_lower);
    let parsed = parse_column(col, allow_bare_year);
    let coverage = parsed.len() as f64 / non_missing as f64;
    if coverage < config.datetime_parse_coverage {
        return None;
    }
    let min = *parsed.iter().min()?;
    let max = *parsed.iter().max()?;
    Some(DatetimeSummary {
        min,
        max,
        granularity: datetime::infer_granularity(&parsed),
    })
}

/// All parseable datetimes of a column, in row order. Used by both schema
/// inference and the analytics stage.
pub fn parse_column(col: &Column, allow_bare_year: bool) -> Vec<chrono::NaiveDateTime> {
    col.values
        .iter()
        .filter_map(|v| datetime::parse_datetime(v, allow_bare_year))
        .collect()
}

/// Whether this column's name marks it as date-like, enabling bare-year
/// parsing.
pub fn has_date_name_hint(name: &str) -> bool {
    DATE_NAME_HINT.is_match(&name.to_lowercase())
}

fn categorical_summary(col: &Column, top_k: usize) -> CategoricalSummary {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for v in &col.values {
        if !v.is_missing() {
            *counts.entry(v.render()).or_insert(0) += 1;
        }
    }
    let mut pairs: Vec<(String, usize)> = counts.into_iter().collect();
    // Count descending, then name, for a deterministic ordering.
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs.truncate(top_k);
    CategoricalSummary { top_values: pairs }
}
