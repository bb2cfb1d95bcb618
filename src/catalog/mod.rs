//! KPI catalog data model.
//!
//! A `KpiDefinition` is what the rule engine emits: a title, prose, a
//! confidence score, and a `QueryShape` describing the query to build.
//! The render stage turns each definition into a `CatalogEntry` carrying
//! the SQL text and a chart suggestion; definitions themselves never hold
//! SQL.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::schema::{Role, TimeBucket};
use crate::stats::SeasonalCycle;

/// KPI family, in ranking-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiCategory {
    Aggregation,
    TimeSeries,
    CategoryBreakdown,
    Statistical,
    Creative,
}

impl KpiCategory {
    /// Tie-break position within the ranked catalog; lower ranks first.
    pub fn priority(&self) -> u8 {
        match self {
            KpiCategory::Aggregation => 0,
            KpiCategory::TimeSeries => 1,
            KpiCategory::CategoryBreakdown => 2,
            KpiCategory::Statistical => 3,
            KpiCategory::Creative => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KpiCategory::Aggregation => "aggregation",
            KpiCategory::TimeSeries => "time_series",
            KpiCategory::CategoryBreakdown => "category_breakdown",
            KpiCategory::Statistical => "statistical",
            KpiCategory::Creative => "creative",
        }
    }
}

/// Suggested visualization for a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Bar,
    Line,
    Histogram,
    BoxPlot,
    ParetoCombo,
    Heatmap,
}

/// Aggregate function a query shape applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFn {
    Sum,
    Avg,
    Count,
    Min,
    Max,
    Median,
}

impl AggregateFn {
    pub fn sql_name(&self) -> &'static str {
        match self {
            AggregateFn::Sum => "SUM",
            AggregateFn::Avg => "AVG",
            AggregateFn::Count => "COUNT",
            AggregateFn::Min => "MIN",
            AggregateFn::Max => "MAX",
            // Rendered as PERCENTILE_CONT(0.5), not a bare function.
            AggregateFn::Median => "MEDIAN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AggregateFn::Sum => "Total",
            AggregateFn::Avg => "Average",
            AggregateFn::Count => "Count of",
            AggregateFn::Min => "Minimum",
            AggregateFn::Max => "Maximum",
            AggregateFn::Median => "Median",
        }
    }
}

/// The query a KPI compiles to. A closed set: every variant has exactly
/// one rendering, so adding a KPI kind means adding a variant here and a
/// match arm in the render stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum QueryShape {
    /// Single aggregate over one column.
    Aggregate { func: AggregateFn, column: String },
    /// COUNT(DISTINCT column).
    DistinctCount { column: String },
    /// COUNT(*) over the whole table.
    RecordCount,
    /// Aggregate per time bucket, ordered by period.
    TimeBucketAggregate {
        func: AggregateFn,
        value_column: String,
        time_column: String,
        bucket: TimeBucket,
    },
    /// Distinct identifiers appearing per time bucket.
    NewPerPeriod {
        id_column: String,
        time_column: String,
        bucket: TimeBucket,
    },
    /// Aggregate per categorical group, ordered by the aggregate.
    GroupedAggregate {
        func: AggregateFn,
        value_column: String,
        group_column: String,
    },
    /// Row count per categorical group.
    GroupedCount { group_column: String },
    /// Each group's share of the column total, as a percentage.
    ShareOfTotal {
        value_column: String,
        group_column: String,
    },
    /// PERCENTILE_CONT at a fraction in [0, 1].
    Percentile { column: String, fraction: f64 },
    /// SUM(numerator) / SUM(denominator).
    Ratio {
        numerator: String,
        denominator: String,
    },
    /// Period-over-period percent change of a bucketed sum.
    GrowthRate {
        value_column: String,
        time_column: String,
        bucket: TimeBucket,
    },
    /// Share of rows outside fixed bounds.
    AnomalyRate {
        column: String,
        lower: f64,
        upper: f64,
    },
    /// Average per seasonal period (day of week or month of year).
    SeasonalAverage {
        value_column: String,
        time_column: String,
        cycle: SeasonalCycle,
    },
    /// Group averages against the overall average.
    CategoryComparison {
        value_column: String,
        group_column: String,
    },
    /// Group totals with cumulative share, largest first.
    Concentration {
        value_column: String,
        group_column: String,
    },
    /// Per-record values with cumulative share, largest first.
    RecordConcentration { column: String },
    /// Share of rows equal to one categorical value.
    BinaryRate { column: String, value: String },
    /// Mean alongside median, for skew inspection.
    MeanMedian { column: String },
    /// Standard deviation relative to the mean.
    VariabilityRatio { column: String },
}

/// The already-computed headline number(s) backing a KPI, taken from the
/// analytics pass. Absent for purely exploratory shapes like time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComputedValue {
    Scalar { value: f64 },
    Breakdown { rows: Vec<(String, f64)> },
}

/// A column a KPI reads, tagged with the role inference assigned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceColumn {
    pub name: String,
    pub role: Role,
}

impl SourceColumn {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// One generated KPI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiDefinition {
    /// Stable content hash; identical inputs yield identical ids.
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: KpiCategory,
    /// Columns the query reads, in the order they matter to the shape.
    pub source_columns: Vec<SourceColumn>,
    pub computed_value: Option<ComputedValue>,
    /// Short observation the supporting statistics justify.
    pub insight: Option<String>,
    /// Suggested next step for whoever reads the catalog.
    pub action: Option<String>,
    /// Rule confidence in [0, 1]; drives ranking.
    pub confidence: f64,
    pub query: QueryShape,
}

/// A KPI plus its rendered artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub kpi: KpiDefinition,
    pub sql_text: String,
    pub chart: ChartType,
}

/// Final pipeline output: ranked entries plus the analysis context they
/// were derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub table_name: String,
    pub row_count: usize,
    pub entries: Vec<CatalogEntry>,
    pub profiles: Vec<crate::schema::ColumnProfile>,
    pub relationships: Vec<crate::stats::RelationshipProfile>,
    pub findings: Vec<crate::stats::Finding>,
    pub quality: crate::quality::QualityReport,
}

/// Deterministic KPI id: a short hash of the rule tag and the columns it
/// reads. Reordering rule evaluation never changes an id.
pub fn kpi_id(rule_tag: &str, columns: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rule_tag.as_bytes());
    for col in columns {
        hasher.update([0u8]);
        hasher.update(col.as_bytes());
    }
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}
