//! Category breakdown rule family: aggregates grouped by categorical
//! columns.

use crate::catalog::{
    kpi_id, AggregateFn, ComputedValue, KpiCategory, KpiDefinition, QueryShape, SourceColumn,
};
use crate::schema::Role;
use crate::stats::{Analysis, RelationshipProfile};

use super::humanize;

pub fn generate(analysis: &Analysis) -> Vec<KpiDefinition> {
    let mut kpis = Vec::new();

    for relationship in &analysis.relationships {
        let cmp = match relationship {
            RelationshipProfile::GroupComparison(cmp) => cmp,
            _ => continue,
        };
        let cat_pretty = humanize(&cmp.categorical);
        let num_pretty = humanize(&cmp.numeric);

        kpis.push(KpiDefinition {
            id: kpi_id("group_sum", &[&cmp.numeric, &cmp.categorical]),
            title: format!("Total {num_pretty} by {cat_pretty}"),
            description: format!("Sum of {} per {} group", cmp.numeric, cmp.categorical),
            category: KpiCategory::CategoryBreakdown,
            source_columns: vec![
                SourceColumn::new(&cmp.numeric, Role::Numeric),
                SourceColumn::new(&cmp.categorical, Role::Categorical),
            ],
            computed_value: None,
            insight: None,
            action: None,
            confidence: 0.85,
            query: QueryShape::GroupedAggregate {
                func: AggregateFn::Sum,
                value_column: cmp.numeric.clone(),
                group_column: cmp.categorical.clone(),
            },
        });

        kpis.push(KpiDefinition {
            id: kpi_id("group_avg", &[&cmp.numeric, &cmp.categorical]),
            title: format!("Average {num_pretty} by {cat_pretty}"),
            description: format!("Mean of {} per {} group", cmp.numeric, cmp.categorical),
            category: KpiCategory::CategoryBreakdown,
            source_columns: vec![
                SourceColumn::new(&cmp.numeric, Role::Numeric),
                SourceColumn::new(&cmp.categorical, Role::Categorical),
            ],
            computed_value: Some(ComputedValue::Breakdown {
                rows: cmp.group_means.clone(),
            }),
            insight: None,
            action: None,
            confidence: 0.8,
            query: QueryShape::GroupedAggregate {
                func: AggregateFn::Avg,
                value_column: cmp.numeric.clone(),
                group_column: cmp.categorical.clone(),
            },
        });

        kpis.push(KpiDefinition {
            id: kpi_id("group_share", &[&cmp.numeric, &cmp.categorical]),
            title: format!("{num_pretty} Share by {cat_pretty}"),
            description: format!(
                "Each {} group's percentage of total {}",
                cmp.categorical, cmp.numeric
            ),
            category: KpiCategory::CategoryBreakdown,
            source_columns: vec![
                SourceColumn::new(&cmp.numeric, Role::Numeric),
                SourceColumn::new(&cmp.categorical, Role::Categorical),
            ],
            computed_value: None,
            insight: None,
            action: None,
            confidence: 0.7,
            query: QueryShape::ShareOfTotal {
                value_column: cmp.numeric.clone(),
                group_column: cmp.categorical.clone(),
            },
        });
    }

    for profile in &analysis.profiles {
        if profile.role != Role::Categorical {
            continue;
        }
        let pretty = humanize(&profile.name);

        kpis.push(KpiDefinition {
            id: kpi_id("group_count", &[&profile.name]),
            title: format!("Record Count by {pretty}"),
            description: format!("Number of rows per {} group", profile.name),
            category: KpiCategory::CategoryBreakdown,
            source_columns: vec![SourceColumn::new(&profile.name, Role::Categorical)],
            computed_value: profile.categorical.as_ref().map(|summary| {
                ComputedValue::Breakdown {
                    rows: summary
                        .top_values
                        .iter()
                        .map(|(value, count)| (value.clone(), *count as f64))
                        .collect(),
                }
            }),
            insight: None,
            action: None,
            confidence: 0.75,
            query: QueryShape::GroupedCount {
                group_column: profile.name.clone(),
            },
        });

        // Binary columns also get a rate for their dominant value.
        if profile.cardinality == 2 {
            if let Some(top) = profile
                .categorical
                .as_ref()
                .and_then(|s| s.top_values.first())
            {
                kpis.push(KpiDefinition {
                    id: kpi_id("binary_rate", &[&profile.name]),
                    title: format!("{pretty} '{}' Rate", top.0),
                    description: format!(
                        "Share of rows where {} equals '{}'",
                        profile.name, top.0
                    ),
                    category: KpiCategory::CategoryBreakdown,
                    source_columns: vec![SourceColumn::new(&profile.name, Role::Categorical)],
                    computed_value: None,
                    insight: None,
                    action: None,
                    confidence: 0.65,
                    query: QueryShape::BinaryRate {
                        column: profile.name.clone(),
                        value: top.0.clone(),
                    },
                });
            }
        }
    }

    kpis
}
