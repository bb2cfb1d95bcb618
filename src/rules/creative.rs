//! Creative rule family: KPIs driven by statistical findings rather than
//! column roles alone. Each one carries an insight sentence and, where a
//! concrete next step exists, an action.

use crate::catalog::{
    kpi_id, AggregateFn, ComputedValue, KpiCategory, KpiDefinition, QueryShape, SourceColumn,
};
use crate::config::PipelineConfig;
use crate::schema::Role;
use crate::stats::{Analysis, Finding, RelationshipProfile, TrendDirection};

use super::humanize;

pub fn generate(analysis: &Analysis, config: &PipelineConfig) -> Vec<KpiDefinition> {
    let mut kpis = Vec::new();

    for finding in &analysis.findings {
        match finding {
            Finding::Outliers(summary) => {
                if summary.z_count == 0 && summary.iqr_count == 0 {
                    continue;
                }
                let pretty = humanize(&summary.column);
                let rate_pct = summary.z_rate * 100.0;
                let action = if rate_pct > config.anomaly_investigation_pct {
                    Some(format!(
                        "Investigate the {} flagged rows; an anomaly rate this high usually means data errors or a process change",
                        summary.z_count
                    ))
                } else {
                    Some("Review the flagged rows for data-entry errors".to_string())
                };
                kpis.push(KpiDefinition {
                    id: kpi_id("anomaly_rate", &[&summary.column]),
                    title: format!("{pretty} Anomaly Rate"),
                    description: format!(
                        "Share of {} values outside the interquartile fences",
                        summary.column
                    ),
                    category: KpiCategory::Creative,
                    source_columns: vec![SourceColumn::new(&summary.column, Role::Numeric)],
                    computed_value: Some(ComputedValue::Scalar {
                        value: summary.iqr_rate,
                    }),
                    insight: Some(format!(
                        "{} values ({:.1}%) sit more than {} standard deviations from the mean",
                        summary.z_count, rate_pct, config.z_score_threshold
                    )),
                    action,
                    confidence: 0.7,
                    query: QueryShape::AnomalyRate {
                        column: summary.column.clone(),
                        lower: summary.iqr_lower,
                        upper: summary.iqr_upper,
                    },
                });
            }
            Finding::Seasonality(finding) => {
                let pretty = humanize(&finding.value_column);
                kpis.push(KpiDefinition {
                    id: kpi_id(
                        &format!("seasonality_{}", finding.cycle.label().replace(' ', "_")),
                        &[&finding.value_column, &finding.time_column],
                    ),
                    title: format!(
                        "{pretty} by {}",
                        humanize(&finding.cycle.label().replace(' ', "_"))
                    ),
                    description: format!(
                        "Average {} per {} of {}",
                        finding.value_column,
                        finding.cycle.label(),
                        finding.time_column
                    ),
                    category: KpiCategory::Creative,
                    source_columns: vec![
                        SourceColumn::new(&finding.value_column, Role::Numeric),
                        SourceColumn::new(&finding.time_column, Role::Datetime),
                    ],
                    computed_value: Some(ComputedValue::Breakdown {
                        rows: finding.period_averages.clone(),
                    }),
                    insight: Some(format!(
                        "{pretty} peaks on {} (avg {:.2}) and bottoms out on {} (avg {:.2})",
                        finding.peak, finding.peak_avg, finding.trough, finding.trough_avg
                    )),
                    action: Some(format!(
                        "Plan capacity and campaigns around the {} peak",
                        finding.peak
                    )),
                    confidence: 0.75,
                    query: QueryShape::SeasonalAverage {
                        value_column: finding.value_column.clone(),
                        time_column: finding.time_column.clone(),
                        cycle: finding.cycle,
                    },
                });
            }
            Finding::Concentration(finding) => {
                if finding.pareto_fraction > config.pareto_alert_fraction {
                    continue;
                }
                let cat_pretty = humanize(&finding.categorical);
                let num_pretty = humanize(&finding.numeric);
                kpis.push(KpiDefinition {
                    id: kpi_id(
                        "concentration",
                        &[&finding.numeric, &finding.categorical],
                    ),
                    title: format!("{num_pretty} Concentration by {cat_pretty}"),
                    description: format!(
                        "Cumulative share of {} across {} groups, largest first",
                        finding.numeric, finding.categorical
                    ),
                    category: KpiCategory::Creative,
                    source_columns: vec![
                        SourceColumn::new(&finding.numeric, Role::Numeric),
                        SourceColumn::new(&finding.categorical, Role::Categorical),
                    ],
                    computed_value: Some(ComputedValue::Breakdown {
                        rows: finding.top_groups.clone(),
                    }),
                    insight: Some(format!(
                        "The top {:.0}% of {} groups account for {:.0}% of total {}",
                        finding.pareto_fraction * 100.0,
                        finding.categorical,
                        finding.reached_share * 100.0,
                        finding.numeric
                    )),
                    action: Some(format!(
                        "Protect the top {} groups; losing one would move the total materially",
                        finding.top_group_count
                    )),
                    confidence: 0.75,
                    query: QueryShape::Concentration {
                        value_column: finding.numeric.clone(),
                        group_column: finding.categorical.clone(),
                    },
                });
            }
            Finding::RecordConcentration(finding) => {
                if finding.pareto_fraction > config.pareto_alert_fraction {
                    continue;
                }
                let pretty = humanize(&finding.column);
                kpis.push(KpiDefinition {
                    id: kpi_id("record_concentration", &[&finding.column]),
                    title: format!("{pretty} Concentration"),
                    description: format!(
                        "Cumulative share of total {} across records, largest first",
                        finding.column
                    ),
                    category: KpiCategory::Creative,
                    source_columns: vec![SourceColumn::new(&finding.column, Role::Numeric)],
                    computed_value: Some(ComputedValue::Scalar {
                        value: finding.pareto_fraction,
                    }),
                    insight: Some(format!(
                        "The top {:.0}% of records account for {:.0}% of total {}",
                        finding.pareto_fraction * 100.0,
                        finding.reached_share * 100.0,
                        finding.column
                    )),
                    action: Some(format!(
                        "A small slice of records carries most of the {}; segment them before drawing averages",
                        finding.column
                    )),
                    confidence: 0.75,
                    query: QueryShape::RecordConcentration {
                        column: finding.column.clone(),
                    },
                });
            }
            Finding::Trend(trend) => {
                if !trend.significant {
                    continue;
                }
                let change = match trend.change_pct {
                    Some(pct) if pct.abs() >= config.trend_change_min_pct => pct,
                    _ => continue,
                };
                let pretty = humanize(&trend.value_column);
                let verb = match trend.direction {
                    TrendDirection::Increasing => "grew",
                    TrendDirection::Decreasing => "declined",
                    TrendDirection::Stable => continue,
                };
                let granularity = analysis
                    .profiles
                    .iter()
                    .find(|p| p.name == trend.time_column)
                    .and_then(|p| p.datetime.as_ref())
                    .map(|d| d.granularity);
                let Some(granularity) = granularity else {
                    continue;
                };
                let Some(&bucket) = granularity.buckets().first() else {
                    continue;
                };
                kpis.push(KpiDefinition {
                    id: kpi_id("trend", &[&trend.value_column, &trend.time_column]),
                    title: format!("{pretty} Trend"),
                    description: format!(
                        "Total {} over time, bucketed by {}",
                        trend.value_column,
                        bucket.label().to_lowercase()
                    ),
                    category: KpiCategory::Creative,
                    source_columns: vec![
                        SourceColumn::new(&trend.value_column, Role::Numeric),
                        SourceColumn::new(&trend.time_column, Role::Datetime),
                    ],
                    computed_value: Some(ComputedValue::Scalar { value: change }),
                    insight: Some(format!(
                        "{pretty} {verb} {:.1}% from the first half of the period to the second",
                        change.abs()
                    )),
                    action: Some(match trend.direction {
                        TrendDirection::Increasing => {
                            "Identify what drives the growth and double down on it".to_string()
                        }
                        _ => "Find the inflection point and what changed there".to_string(),
                    }),
                    confidence: 0.8,
                    query: QueryShape::TimeBucketAggregate {
                        func: AggregateFn::Sum,
                        value_column: trend.value_column.clone(),
                        time_column: trend.time_column.clone(),
                        bucket,
                    },
                });
            }
        }
    }

    for relationship in &analysis.relationships {
        let cmp = match relationship {
            RelationshipProfile::GroupComparison(c) => c,
            _ => continue,
        };
        let Some(gap_pct) = cmp.gap_pct else { continue };
        if gap_pct <= 0.0 {
            continue;
        }
        // Uplift if the bottom group closed half its gap to the median group.
        let median_mean = median_group_mean(&cmp.group_means);
        let uplift_pct = (median_mean - cmp.bottom.1) / 2.0 / cmp.bottom.1.abs() * 100.0;
        let action = if uplift_pct > 0.0 {
            Some(format!(
                "Closing half the gap to the median group would lift '{}' roughly {:.0}%",
                cmp.bottom.0, uplift_pct
            ))
        } else {
            Some(format!(
                "Study what '{}' does differently and replicate it",
                cmp.top.0
            ))
        };
        let cat_pretty = humanize(&cmp.categorical);
        let num_pretty = humanize(&cmp.numeric);
        kpis.push(KpiDefinition {
            id: kpi_id("performance_gap", &[&cmp.numeric, &cmp.categorical]),
            title: format!("{num_pretty} Gap across {cat_pretty}"),
            description: format!(
                "Average {} of each {} group against the overall average",
                cmp.numeric, cmp.categorical
            ),
            category: KpiCategory::Creative,
            source_columns: vec![
                SourceColumn::new(&cmp.numeric, Role::Numeric),
                SourceColumn::new(&cmp.categorical, Role::Categorical),
            ],
            computed_value: Some(ComputedValue::Scalar { value: gap_pct }),
            insight: Some(format!(
                "'{}' averages {:.2} while '{}' averages {:.2}, a {:.0}% gap",
                cmp.top.0, cmp.top.1, cmp.bottom.0, cmp.bottom.1, gap_pct
            )),
            action,
            confidence: 0.7,
            query: QueryShape::CategoryComparison {
                value_column: cmp.numeric.clone(),
                group_column: cmp.categorical.clone(),
            },
        });
    }

    for profile in &analysis.profiles {
        if profile.role != Role::Numeric {
            continue;
        }
        let Some(summary) = &profile.numeric else { continue };
        let pretty = humanize(&profile.name);

        if let Some(skew) = summary.skewness {
            if skew.abs() > config.skewness_threshold {
                let tail = if skew > 0.0 { "high" } else { "low" };
                kpis.push(KpiDefinition {
                    id: kpi_id("skewness", &[&profile.name]),
                    title: format!("{pretty} Mean vs Median"),
                    description: format!(
                        "Mean and median of {} side by side",
                        profile.name
                    ),
                    category: KpiCategory::Creative,
                    source_columns: vec![SourceColumn::new(&profile.name, Role::Numeric)],
                    computed_value: Some(ComputedValue::Scalar { value: skew }),
                    insight: Some(format!(
                        "{pretty} is skewed toward {tail} values (skewness {:.2}); the mean is a misleading summary",
                        skew
                    )),
                    action: Some(format!(
                        "Prefer the median when reporting typical {}",
                        profile.name
                    )),
                    confidence: 0.6,
                    query: QueryShape::MeanMedian {
                        column: profile.name.clone(),
                    },
                });
            }
        }

        if let Some(cv) = summary.cv_pct {
            if cv > config.variability_cv_pct {
                kpis.push(KpiDefinition {
                    id: kpi_id("variability", &[&profile.name]),
                    title: format!("{pretty} Variability"),
                    description: format!(
                        "Standard deviation of {} relative to its mean",
                        profile.name
                    ),
                    category: KpiCategory::Creative,
                    source_columns: vec![SourceColumn::new(&profile.name, Role::Numeric)],
                    computed_value: Some(ComputedValue::Scalar { value: cv }),
                    insight: Some(format!(
                        "{pretty} varies widely (coefficient of variation {:.0}%)",
                        cv
                    )),
                    action: Some(format!(
                        "Segment {} before averaging; one number hides the spread",
                        profile.name
                    )),
                    confidence: 0.6,
                    query: QueryShape::VariabilityRatio {
                        column: profile.name.clone(),
                    },
                });
            }
        }
    }

    kpis
}

/// Median of the per-group means; the slice arrives sorted by mean.
fn median_group_mean(group_means: &[(String, f64)]) -> f64 {
    let n = group_means.len();
    let mid = n / 2;
    if n % 2 == 0 {
        (group_means[mid - 1].1 + group_means[mid].1) / 2.0
    } else {
        group_means[mid].1
    }
}
