//! Pipeline configuration.
//!
//! Every threshold used by inference, analytics, and rule generation is
//! named here with a documented default. A config can be loaded from a
//! TOML file (heron.toml); unspecified fields keep their defaults.
//!
//! Example configuration:
//! ```toml
//! table_name = "orders"
//! correlation_threshold = 0.8
//! z_score_threshold = 2.5
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

/// Thresholds and knobs for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Table name substituted into generated SQL.
    pub table_name: String,

    /// Distinct-to-row ratio at or above which a column is an identifier
    /// candidate (default 0.95).
    pub identifier_unique_ratio: f64,

    /// Fraction of non-missing values matching an integer/UUID/code
    /// pattern required for the identifier role (default 0.95).
    pub identifier_pattern_coverage: f64,

    /// Fraction of non-missing values that must parse under a known
    /// date/time format for the datetime role (default 0.8).
    pub datetime_parse_coverage: f64,

    /// Absolute cardinality cutoff for the categorical role (default 50).
    pub categorical_max_cardinality: usize,

    /// Relative cardinality cutoff for the categorical role (default 0.05).
    pub categorical_max_ratio: f64,

    /// Fraction of non-missing values that must parse as numbers for the
    /// numeric role (default 0.8).
    pub numeric_parse_coverage: f64,

    /// How many top value frequencies to record per categorical column
    /// (default 5).
    pub top_k_values: usize,

    /// |r| at or above which a correlation is strong and retained
    /// (default 0.7).
    pub correlation_threshold: f64,

    /// |z| at or above which a value counts as a Z-score outlier
    /// (default 3.0).
    pub z_score_threshold: f64,

    /// IQR fence multiplier (default 1.5).
    pub iqr_multiplier: f64,

    /// Cumulative share of total value the Pareto check looks for
    /// (default 0.8).
    pub pareto_target: f64,

    /// Leading record fraction at or below which concentration is worth a
    /// creative KPI (default 0.5).
    pub pareto_alert_fraction: f64,

    /// |r| of the fitted trend below which direction reports as stable
    /// (default 0.4).
    pub trend_significance: f64,

    /// Minimum half-over-half change, in percent, for a trend-change KPI
    /// (default 10.0).
    pub trend_change_min_pct: f64,

    /// Minimum rows before seasonality detection runs (default 30).
    pub seasonality_min_rows: usize,

    /// Bucket variance must exceed this fraction of the bucket mean for a
    /// day-of-week pattern to register (default 0.1).
    pub weekly_variation_ratio: f64,

    /// Same, for calendar-month patterns (default 0.15).
    pub monthly_variation_ratio: f64,

    /// Outlier rate, in percent, above which the anomaly KPI recommends
    /// investigation (default 5.0).
    pub anomaly_investigation_pct: f64,

    /// |skewness| above which a distribution-shape KPI is emitted
    /// (default 1.0).
    pub skewness_threshold: f64,

    /// Coefficient of variation, in percent, above which a variability
    /// KPI is emitted (default 50.0).
    pub variability_cv_pct: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            table_name: "your_table".into(),
            identifier_unique_ratio: 0.95,
            identifier_pattern_coverage: 0.95,
            datetime_parse_coverage: 0.8,
            categorical_max_cardinality: 50,
            categorical_max_ratio: 0.05,
            numeric_parse_coverage: 0.8,
            top_k_values: 5,
            correlation_threshold: 0.7,
            z_score_threshold: 3.0,
            iqr_multiplier: 1.5,
            pareto_target: 0.8,
            pareto_alert_fraction: 0.5,
            trend_significance: 0.4,
            trend_change_min_pct: 10.0,
            seasonality_min_rows: 30,
            weekly_variation_ratio: 0.1,
            monthly_variation_ratio: 0.15,
            anomaly_investigation_pct: 5.0,
            skewness_threshold: 1.0,
            variability_cv_pct: 50.0,
        }
    }
}

impl PipelineConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> PipelineResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PipelineError::ConfigNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> PipelineResult<()> {
        let unit_bounded: [(&str, f64); 8] = [
            ("identifier_unique_ratio", self.identifier_unique_ratio),
            (
                "identifier_pattern_coverage",
                self.identifier_pattern_coverage,
            ),
            ("datetime_parse_coverage", self.datetime_parse_coverage),
            ("categorical_max_ratio", self.categorical_max_ratio),
            ("numeric_parse_coverage", self.numeric_parse_coverage),
            ("correlation_threshold", self.correlation_threshold),
            ("pareto_target", self.pareto_target),
            ("pareto_alert_fraction", self.pareto_alert_fraction),
        ];
        for (name, v) in unit_bounded {
            if !(0.0..=1.0).contains(&v) {
                return Err(PipelineError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {v}"
                )));
            }
        }
        if self.z_score_threshold <= 0.0 {
            return Err(PipelineError::InvalidConfig(
                "z_score_threshold must be positive".into(),
            ));
        }
        if self.iqr_multiplier <= 0.0 {
            return Err(PipelineError::InvalidConfig(
                "iqr_multiplier must be positive".into(),
            ));
        }
        if self.table_name.trim().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "table_name must not be empty".into(),
            ));
        }
        Ok(())
    }
}
