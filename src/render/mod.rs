//! Artifact synthesis: turn KPI definitions into SQL text and chart
//! suggestions.
//!
//! Rendering is a pure function of the definition and the table name.
//! The match on `QueryShape` is exhaustive, so a new shape cannot ship
//! without a rendering.

use crate::catalog::{
    AggregateFn, Catalog, CatalogEntry, ChartType, KpiDefinition, QueryShape,
};
use crate::config::PipelineConfig;
use crate::quality::QualityReport;
use crate::sql::{
    avg, col, count_distinct, count_star, func, lag_over, lit_float, lit_str, over_all,
    percentile_cont, sum, BinaryOperator, Cte, Expr, OrderByExpr, Query, SelectExpr, TableRef,
    WindowOrderBy,
};
use crate::stats::{Analysis, SeasonalCycle};

/// Render every KPI into a catalog entry and assemble the final catalog.
pub fn render_catalog(
    kpis: Vec<KpiDefinition>,
    analysis: Analysis,
    quality: QualityReport,
    config: &PipelineConfig,
) -> Catalog {
    let entries = kpis
        .into_iter()
        .map(|kpi| render_entry(kpi, &config.table_name))
        .collect();
    Catalog {
        table_name: config.table_name.clone(),
        row_count: analysis.row_count,
        entries,
        profiles: analysis.profiles,
        relationships: analysis.relationships,
        findings: analysis.findings,
        quality,
    }
}

/// Render one KPI definition.
pub fn render_entry(kpi: KpiDefinition, table_name: &str) -> CatalogEntry {
    let sql_text = build_query(&kpi.query, table_name).to_sql();
    let chart = chart_for(&kpi.query);
    CatalogEntry {
        kpi,
        sql_text,
        chart,
    }
}

/// Chart suggestion per query shape.
fn chart_for(shape: &QueryShape) -> ChartType {
    match shape {
        QueryShape::Aggregate { .. }
        | QueryShape::DistinctCount { .. }
        | QueryShape::RecordCount
        | QueryShape::GroupedAggregate { .. }
        | QueryShape::GroupedCount { .. }
        | QueryShape::ShareOfTotal { .. }
        | QueryShape::BinaryRate { .. }
        | QueryShape::CategoryComparison { .. } => ChartType::Bar,
        QueryShape::TimeBucketAggregate { .. }
        | QueryShape::NewPerPeriod { .. }
        | QueryShape::GrowthRate { .. } => ChartType::Line,
        QueryShape::Percentile { .. }
        | QueryShape::Ratio { .. }
        | QueryShape::MeanMedian { .. }
        | QueryShape::VariabilityRatio { .. } => ChartType::Histogram,
        QueryShape::AnomalyRate { .. } => ChartType::BoxPlot,
        QueryShape::SeasonalAverage { .. } => ChartType::Heatmap,
        QueryShape::Concentration { .. } | QueryShape::RecordConcentration { .. } => {
            ChartType::ParetoCombo
        }
    }
}

fn aggregate_expr(func_kind: AggregateFn, column: &str) -> Expr {
    match func_kind {
        AggregateFn::Median => percentile_cont(0.5, col(column)),
        AggregateFn::Count => count_star(),
        other => func(other.sql_name(), vec![col(column)]),
    }
}

fn date_trunc(bucket: crate::schema::TimeBucket, column: &str) -> Expr {
    func(
        "DATE_TRUNC",
        vec![lit_str(&bucket.label().to_lowercase()), col(column)],
    )
}

/// Percent-of-rows expression: AVG(CASE WHEN cond THEN 1.0 ELSE 0.0 END) * 100.0
fn rate_pct(condition: Expr) -> Expr {
    let case = Expr::Case {
        when_clauses: vec![(condition, lit_float(1.0))],
        else_clause: Some(Box::new(lit_float(0.0))),
    };
    avg(case).binary(BinaryOperator::Mul, lit_float(100.0))
}

/// Build the SELECT statement for a query shape.
pub fn build_query(shape: &QueryShape, table_name: &str) -> Query {
    let table = TableRef::new(table_name);
    match shape {
        QueryShape::Aggregate { func, column } => {
            let alias = format!("{}_{}", func.sql_name().to_lowercase(), column);
            Query::new()
                .select(vec![
                    SelectExpr::new(aggregate_expr(*func, column)).with_alias(&alias)
                ])
                .from(table)
        }

        QueryShape::DistinctCount { column } => Query::new()
            .select(vec![SelectExpr::new(count_distinct(col(column)))
                .with_alias(&format!("unique_{column}"))])
            .from(table),

        QueryShape::RecordCount => Query::new()
            .select(vec![SelectExpr::new(count_star()).with_alias("record_count")])
            .from(table),

        QueryShape::TimeBucketAggregate {
            func,
            value_column,
            time_column,
            bucket,
        } => {
            let alias = format!("{}_{}", func.sql_name().to_lowercase(), value_column);
            Query::new()
                .select(vec![
                    SelectExpr::new(date_trunc(*bucket, time_column)).with_alias("period"),
                    SelectExpr::new(aggregate_expr(*func, value_column)).with_alias(&alias),
                ])
                .from(table)
                .group_by(vec![date_trunc(*bucket, time_column)])
                .order_by(vec![OrderByExpr::asc(col("period"))])
        }

        QueryShape::NewPerPeriod {
            id_column,
            time_column,
            bucket,
        } => Query::new()
            .select(vec![
                SelectExpr::new(date_trunc(*bucket, time_column)).with_alias("period"),
                SelectExpr::new(count_distinct(col(id_column)))
                    .with_alias(&format!("unique_{id_column}")),
            ])
            .from(table)
            .group_by(vec![date_trunc(*bucket, time_column)])
            .order_by(vec![OrderByExpr::asc(col("period"))]),

        QueryShape::GroupedAggregate {
            func,
            value_column,
            group_column,
        } => {
            let alias = format!("{}_{}", func.sql_name().to_lowercase(), value_column);
            Query::new()
                .select(vec![
                    SelectExpr::new(col(group_column)),
                    SelectExpr::new(aggregate_expr(*func, value_column)).with_alias(&alias),
                ])
                .from(table)
                .group_by(vec![col(group_column)])
                .order_by(vec![OrderByExpr::desc(col(&alias))])
        }

        QueryShape::GroupedCount { group_column } => Query::new()
            .select(vec![
                SelectExpr::new(col(group_column)),
                SelectExpr::new(count_star()).with_alias("record_count"),
            ])
            .from(table)
            .group_by(vec![col(group_column)])
            .order_by(vec![OrderByExpr::desc(col("record_count"))]),

        QueryShape::ShareOfTotal {
            value_column,
            group_column,
        } => {
            let share = sum(col(value_column))
                .binary(BinaryOperator::Mul, lit_float(100.0))
                .binary(BinaryOperator::Div, over_all(sum(sum(col(value_column)))));
            Query::new()
                .select(vec![
                    SelectExpr::new(col(group_column)),
                    SelectExpr::new(share).with_alias("share_pct"),
                ])
                .from(table)
                .group_by(vec![col(group_column)])
                .order_by(vec![OrderByExpr::desc(col("share_pct"))])
        }

        QueryShape::Percentile { column, fraction } => {
            let alias = format!("p{:02}_{}", (fraction * 100.0).round() as i64, column);
            Query::new()
                .select(vec![
                    SelectExpr::new(percentile_cont(*fraction, col(column))).with_alias(&alias)
                ])
                .from(table)
        }

        QueryShape::Ratio {
            numerator,
            denominator,
        } => {
            let ratio = sum(col(numerator)).binary(BinaryOperator::Div, sum(col(denominator)));
            Query::new()
                .select(vec![SelectExpr::new(ratio)
                    .with_alias(&format!("{numerator}_per_{denominator}"))])
                .from(table)
        }

        QueryShape::GrowthRate {
            value_column,
            time_column,
            bucket,
        } => {
            let inner = Query::new()
                .select(vec![
                    SelectExpr::new(date_trunc(*bucket, time_column)).with_alias("period"),
                    SelectExpr::new(sum(col(value_column))).with_alias("total"),
                ])
                .from(table)
                .group_by(vec![date_trunc(*bucket, time_column)]);
            let prev = || lag_over(col("total"), vec![WindowOrderBy::asc(col("period"))]);
            let growth = Expr::Paren(Box::new(
                col("total").binary(BinaryOperator::Minus, prev()),
            ))
            .binary(BinaryOperator::Mul, lit_float(100.0))
            .binary(BinaryOperator::Div, prev());
            Query::new()
                .with_cte(Cte::new("periods", inner))
                .select(vec![
                    SelectExpr::new(col("period")),
                    SelectExpr::new(col("total")),
                    SelectExpr::new(growth).with_alias("growth_pct"),
                ])
                .from(TableRef::new("periods"))
                .order_by(vec![OrderByExpr::asc(col("period"))])
        }

        QueryShape::AnomalyRate {
            column,
            lower,
            upper,
        } => {
            let outside = col(column)
                .binary(BinaryOperator::Lt, lit_float(*lower))
                .binary(
                    BinaryOperator::Or,
                    col(column).binary(BinaryOperator::Gt, lit_float(*upper)),
                );
            Query::new()
                .select(vec![SelectExpr::new(rate_pct(outside)).with_alias("anomaly_pct")])
                .from(table)
        }

        QueryShape::SeasonalAverage {
            value_column,
            time_column,
            cycle,
        } => {
            let part = match cycle {
                SeasonalCycle::DayOfWeek => "dow",
                SeasonalCycle::MonthOfYear => "month",
            };
            let period = func("DATE_PART", vec![lit_str(part), col(time_column)]);
            Query::new()
                .select(vec![
                    SelectExpr::new(period.clone()).with_alias("period"),
                    SelectExpr::new(avg(col(value_column)))
                        .with_alias(&format!("avg_{value_column}")),
                ])
                .from(table)
                .group_by(vec![period])
                .order_by(vec![OrderByExpr::asc(col("period"))])
        }

        QueryShape::CategoryComparison {
            value_column,
            group_column,
        } => {
            let alias = format!("avg_{value_column}");
            Query::new()
                .select(vec![
                    SelectExpr::new(col(group_column)),
                    SelectExpr::new(avg(col(value_column))).with_alias(&alias),
                ])
                .from(table)
                .group_by(vec![col(group_column)])
                .order_by(vec![OrderByExpr::desc(col(&alias))])
        }

        QueryShape::Concentration {
            value_column,
            group_column,
        } => {
            let total = sum(col(value_column));
            // Running share ordered by group total descending, over the
            // grand total.
            let running = Expr::WindowFunction {
                function: Box::new(sum(total.clone())),
                order_by: vec![WindowOrderBy::desc(total.clone())],
            };
            let share = running
                .binary(BinaryOperator::Mul, lit_float(100.0))
                .binary(BinaryOperator::Div, cumulative_total(value_column));
            Query::new()
                .select(vec![
                    SelectExpr::new(col(group_column)),
                    SelectExpr::new(total.clone()).with_alias("total"),
                    SelectExpr::new(share).with_alias("cumulative_share_pct"),
                ])
                .from(table)
                .group_by(vec![col(group_column)])
                .order_by(vec![OrderByExpr::desc(col("total"))])
        }

        QueryShape::RecordConcentration { column } => {
            // Running share per record ordered by value descending, over
            // the grand total.
            let running = Expr::WindowFunction {
                function: Box::new(sum(col(column))),
                order_by: vec![WindowOrderBy::desc(col(column))],
            };
            let share = running
                .binary(BinaryOperator::Mul, lit_float(100.0))
                .binary(BinaryOperator::Div, over_all(sum(col(column))));
            Query::new()
                .select(vec![
                    SelectExpr::new(col(column)),
                    SelectExpr::new(share).with_alias("cumulative_share_pct"),
                ])
                .from(table)
                .order_by(vec![OrderByExpr::desc(col(column))])
        }

        QueryShape::BinaryRate { column, value } => {
            let matches = col(column).binary(BinaryOperator::Eq, lit_str(value));
            Query::new()
                .select(vec![SelectExpr::new(rate_pct(matches)).with_alias("rate_pct")])
                .from(table)
        }

        QueryShape::MeanMedian { column } => Query::new()
            .select(vec![
                SelectExpr::new(avg(col(column))).with_alias(&format!("mean_{column}")),
                SelectExpr::new(percentile_cont(0.5, col(column)))
                    .with_alias(&format!("median_{column}")),
            ])
            .from(table),

        QueryShape::VariabilityRatio { column } => {
            let cv = func("STDDEV", vec![col(column)])
                .binary(BinaryOperator::Mul, lit_float(100.0))
                .binary(BinaryOperator::Div, avg(col(column)));
            Query::new()
                .select(vec![SelectExpr::new(cv).with_alias("cv_pct")])
                .from(table)
        }
    }
}

/// SUM(SUM(col)) OVER (), the grand total usable next to a GROUP BY.
fn cumulative_total(value_column: &str) -> Expr {
    over_all(sum(sum(col(value_column))))
}
