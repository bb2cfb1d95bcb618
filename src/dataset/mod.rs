//! In-memory tabular input.
//!
//! A [`Dataset`] is an ordered sequence of named columns, each an ordered
//! sequence of scalar [`Value`]s. It is immutable for the duration of one
//! pipeline run; every downstream stage produces new structures that
//! reference it, never edits it. Loading from CSV or Excel is the caller's
//! concern (the CLI binary does CSV).

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// A scalar cell value. Missing cells are `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Value {
    /// Missing means NULL or an empty/whitespace-only string.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric view of this value. Text is parsed after trimming;
    /// non-finite results are treated as absent.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Value::Int(n) => *n as f64,
            Value::Float(f) => *f,
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
            Value::Null | Value::Bool(_) => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Canonical text rendering used for cardinality counting and
    /// categorical bucketing.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => {
                let mut buffer = ryu::Buffer::new();
                buffer.format(*f).to_string()
            }
            Value::Bool(b) => b.to_string(),
            Value::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        if s.trim().is_empty() {
            Value::Null
        } else {
            Value::Text(s.to_string())
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        if f.is_finite() {
            Value::Float(f)
        } else {
            Value::Null
        }
    }
}

/// A named column of values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Number of non-missing values.
    pub fn non_missing(&self) -> usize {
        self.values.iter().filter(|v| !v.is_missing()).count()
    }

    /// Fraction of missing values, 0.0 for an empty column.
    pub fn missing_ratio(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let missing = self.values.len() - self.non_missing();
        missing as f64 / self.values.len() as f64
    }

    /// Distinct non-missing values, counted over canonical renderings.
    pub fn cardinality(&self) -> usize {
        let mut seen = std::collections::HashSet::new();
        for v in &self.values {
            if !v.is_missing() {
                seen.insert(v.render());
            }
        }
        seen.len()
    }

    /// All finite numeric values, in row order. Missing and unparseable
    /// cells are skipped.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(Value::as_f64).collect()
    }

    /// Fraction of non-missing values that parse as finite numbers.
    pub fn numeric_coverage(&self) -> f64 {
        let non_missing = self.non_missing();
        if non_missing == 0 {
            return 0.0;
        }
        self.numeric_values().len() as f64 / non_missing as f64
    }
}

/// An immutable tabular dataset: ordered named columns of equal length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Build a dataset, validating shape: at least one column, at least one
    /// row, and equal column lengths.
    pub fn new(columns: Vec<Column>) -> PipelineResult<Self> {
        let Some(first) = columns.first() else {
            return Err(PipelineError::NoColumns);
        };
        let row_count = first.values.len();
        if row_count == 0 {
            return Err(PipelineError::EmptyDataset);
        }
        for col in &columns {
            if col.values.len() != row_count {
                return Err(PipelineError::ColumnLengthMismatch {
                    column: col.name.clone(),
                    expected: row_count,
                    actual: col.values.len(),
                });
            }
        }
        Ok(Self { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}
