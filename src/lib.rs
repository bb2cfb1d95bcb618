//! # Heron
//!
//! Automatic KPI catalog generation: point it at a table of raw data and
//! it infers the schema, analyzes the statistics, and compiles a ranked
//! catalog of KPI definitions to SQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Dataset (columns of values)              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [schema inference]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Column Profiles (identifier / datetime /          │
//! │             categorical / numeric / text)                │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [analytics]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Analysis (summaries, relationships, findings)        │
//! │     + Quality Report (five scored dimensions)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [rule engine]
//! ┌─────────────────────────────────────────────────────────┐
//! │          KPI Definitions (ranked, deduplicated)          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [render]
//! ┌─────────────────────────────────────────────────────────┐
//! │           Catalog (SQL text + chart suggestions)         │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod pipeline;
pub mod quality;
pub mod refine;
pub mod render;
pub mod rules;
pub mod schema;
pub mod sql;
pub mod stats;

// Re-export SQL submodules at crate level for convenience
pub use sql::expr;
pub use sql::query;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::catalog::{
        Catalog, CatalogEntry, ChartType, ComputedValue, KpiCategory, KpiDefinition, QueryShape,
        SourceColumn,
    };
    pub use crate::config::PipelineConfig;
    pub use crate::dataset::{Column, Dataset, Value};
    pub use crate::error::{PipelineError, PipelineResult};
    pub use crate::pipeline::{run, run_with_refiner};
    pub use crate::quality::QualityReport;
    pub use crate::refine::{RefineError, RefinedText, TextRefiner};
    pub use crate::schema::{ColumnProfile, Granularity, Role, TimeBucket};
    pub use crate::stats::{Analysis, Finding, RelationshipProfile};
}
