//! Aggregation rule family: basic aggregates over single columns.

use crate::catalog::{
    kpi_id, AggregateFn, ComputedValue, KpiCategory, KpiDefinition, QueryShape, SourceColumn,
};
use crate::schema::Role;
use crate::stats::Analysis;

use super::humanize;

const AGGREGATES: [(AggregateFn, &str, f64); 6] = [
    (AggregateFn::Sum, "sum", 0.9),
    (AggregateFn::Avg, "avg", 0.85),
    (AggregateFn::Count, "count", 0.8),
    (AggregateFn::Median, "median", 0.75),
    (AggregateFn::Min, "min", 0.7),
    (AggregateFn::Max, "max", 0.7),
];

pub fn generate(analysis: &Analysis) -> Vec<KpiDefinition> {
    let mut kpis = Vec::new();

    kpis.push(KpiDefinition {
        id: kpi_id("record_count", &[]),
        title: "Total Records".to_string(),
        description: "Number of rows in the dataset".to_string(),
        category: KpiCategory::Aggregation,
        source_columns: vec![],
        computed_value: Some(ComputedValue::Scalar {
            value: analysis.row_count as f64,
        }),
        insight: None,
        action: None,
        confidence: 0.95,
        query: QueryShape::RecordCount,
    });

    for profile in &analysis.profiles {
        match profile.role {
            Role::Numeric => {
                let summary = match &profile.numeric {
                    Some(s) => s,
                    None => continue,
                };
                let pretty = humanize(&profile.name);
                for (func, tag, confidence) in AGGREGATES {
                    let value = match func {
                        AggregateFn::Sum => summary.sum,
                        AggregateFn::Avg => summary.mean,
                        AggregateFn::Count => summary.count as f64,
                        AggregateFn::Median => summary.median,
                        AggregateFn::Min => summary.min,
                        AggregateFn::Max => summary.max,
                    };
                    let description = match func {
                        AggregateFn::Count => {
                            format!("Count of non-null {} values across all rows", profile.name)
                        }
                        _ => format!(
                            "{} of the {} column across all rows",
                            func.label(),
                            profile.name
                        ),
                    };
                    kpis.push(KpiDefinition {
                        id: kpi_id(tag, &[&profile.name]),
                        title: format!("{} {}", func.label(), pretty),
                        description,
                        category: KpiCategory::Aggregation,
                        source_columns: vec![SourceColumn::new(&profile.name, Role::Numeric)],
                        computed_value: Some(ComputedValue::Scalar { value }),
                        insight: None,
                        action: None,
                        confidence,
                        query: QueryShape::Aggregate {
                            func,
                            column: profile.name.clone(),
                        },
                    });
                }
            }
            Role::Identifier => {
                let pretty = humanize(&profile.name);
                kpis.push(KpiDefinition {
                    id: kpi_id("distinct_count", &[&profile.name]),
                    title: format!("Unique {pretty}"),
                    description: format!("Number of distinct {} values", profile.name),
                    category: KpiCategory::Aggregation,
                    source_columns: vec![SourceColumn::new(&profile.name, Role::Identifier)],
                    computed_value: Some(ComputedValue::Scalar {
                        value: profile.cardinality as f64,
                    }),
                    insight: None,
                    action: None,
                    confidence: 0.9,
                    query: QueryShape::DistinctCount {
                        column: profile.name.clone(),
                    },
                });
            }
            _ => {}
        }
    }

    kpis
}
