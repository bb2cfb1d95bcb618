//! Error types for the KPI pipeline.
//!
//! The pipeline fails fast on malformed input; everything past input
//! validation is total. Inference ambiguity falls back to the text role,
//! degenerate statistics are omitted rather than raised, and duplicate
//! KPI ids are dropped deterministically.

use std::path::PathBuf;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Structured failure conditions for the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("dataset has no columns")]
    NoColumns,

    #[error("dataset has no rows")]
    EmptyDataset,

    #[error("column '{column}' has {actual} values, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("failed to read config file: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
