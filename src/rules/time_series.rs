//! Time-series rule family: bucketed aggregates over datetime columns.
//!
//! Buckets finer than the column's inferred granularity are never
//! emitted; a year-grained column only yields yearly series.

use crate::catalog::{
    kpi_id, AggregateFn, KpiCategory, KpiDefinition, QueryShape, SourceColumn,
};
use crate::schema::{Role, TimeBucket};
use crate::stats::Analysis;

use super::humanize;

fn bucket_adverb(bucket: TimeBucket) -> &'static str {
    match bucket {
        TimeBucket::Day => "Daily",
        TimeBucket::Month => "Monthly",
        TimeBucket::Year => "Yearly",
    }
}

fn bucket_confidence(bucket: TimeBucket) -> f64 {
    match bucket {
        TimeBucket::Day => 0.85,
        TimeBucket::Month => 0.8,
        TimeBucket::Year => 0.75,
    }
}

pub fn generate(analysis: &Analysis) -> Vec<KpiDefinition> {
    let mut kpis = Vec::new();

    let datetimes: Vec<_> = analysis
        .profiles
        .iter()
        .filter(|p| p.role == Role::Datetime && p.datetime.is_some())
        .collect();
    let numerics: Vec<_> = analysis
        .profiles
        .iter()
        .filter(|p| p.role == Role::Numeric)
        .collect();
    let identifiers: Vec<_> = analysis
        .profiles
        .iter()
        .filter(|p| p.role == Role::Identifier)
        .collect();

    for dt in &datetimes {
        let granularity = match &dt.datetime {
            Some(summary) => summary.granularity,
            None => continue,
        };
        let dt_pretty = humanize(&dt.name);

        for num in &numerics {
            let num_pretty = humanize(&num.name);
            for &bucket in granularity.buckets() {
                kpis.push(KpiDefinition {
                    id: kpi_id(
                        &format!("time_sum_{}", bucket.label().to_lowercase()),
                        &[&num.name, &dt.name],
                    ),
                    title: format!("{} Total {num_pretty}", bucket_adverb(bucket)),
                    description: format!(
                        "Sum of {} per {} of {}",
                        num.name,
                        bucket.label().to_lowercase(),
                        dt.name
                    ),
                    category: KpiCategory::TimeSeries,
                    source_columns: vec![
                        SourceColumn::new(&num.name, Role::Numeric),
                        SourceColumn::new(&dt.name, Role::Datetime),
                    ],
                    computed_value: None,
                    insight: None,
                    action: None,
                    confidence: bucket_confidence(bucket),
                    query: QueryShape::TimeBucketAggregate {
                        func: AggregateFn::Sum,
                        value_column: num.name.clone(),
                        time_column: dt.name.clone(),
                        bucket,
                    },
                });
            }
        }

        // Newly seen identifiers per finest allowed bucket.
        if let Some(&bucket) = granularity.buckets().first() {
            for ident in &identifiers {
                let ident_pretty = humanize(&ident.name);
                kpis.push(KpiDefinition {
                    id: kpi_id("new_per_period", &[&ident.name, &dt.name]),
                    title: format!(
                        "{} per {} ({dt_pretty})",
                        ident_pretty,
                        bucket.label()
                    ),
                    description: format!(
                        "Distinct {} values appearing in each {} of {}",
                        ident.name,
                        bucket.label().to_lowercase(),
                        dt.name
                    ),
                    category: KpiCategory::TimeSeries,
                    source_columns: vec![
                        SourceColumn::new(&ident.name, Role::Identifier),
                        SourceColumn::new(&dt.name, Role::Datetime),
                    ],
                    computed_value: None,
                    insight: None,
                    action: None,
                    confidence: 0.7,
                    query: QueryShape::NewPerPeriod {
                        id_column: ident.name.clone(),
                        time_column: dt.name.clone(),
                        bucket,
                    },
                });
            }
        }
    }

    kpis
}
