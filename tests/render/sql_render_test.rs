//! Rendered SQL: shape, quoting, and parseability under a generic
//! dialect.

use heron::catalog::{AggregateFn, ChartType, KpiCategory, KpiDefinition, QueryShape};
use heron::render::{build_query, render_entry};
use heron::schema::TimeBucket;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

fn assert_parses(sql: &str) {
    let without_terminator = sql.trim_end_matches(';');
    let parsed = Parser::parse_sql(&GenericDialect {}, without_terminator);
    assert!(parsed.is_ok(), "unparseable SQL: {sql}\n{parsed:?}");
    assert_eq!(parsed.unwrap().len(), 1);
}

fn kpi_with(query: QueryShape) -> KpiDefinition {
    KpiDefinition {
        id: "test".into(),
        title: "Test".into(),
        description: String::new(),
        category: KpiCategory::Aggregation,
        source_columns: vec![],
        computed_value: None,
        insight: None,
        action: None,
        confidence: 0.9,
        query,
    }
}

#[test]
fn simple_shapes_parse_under_a_generic_dialect() {
    let shapes = vec![
        QueryShape::RecordCount,
        QueryShape::Aggregate {
            func: AggregateFn::Sum,
            column: "amount".into(),
        },
        QueryShape::Aggregate {
            func: AggregateFn::Avg,
            column: "amount".into(),
        },
        QueryShape::DistinctCount {
            column: "order_id".into(),
        },
        QueryShape::TimeBucketAggregate {
            func: AggregateFn::Sum,
            value_column: "amount".into(),
            time_column: "order_date".into(),
            bucket: TimeBucket::Month,
        },
        QueryShape::NewPerPeriod {
            id_column: "order_id".into(),
            time_column: "order_date".into(),
            bucket: TimeBucket::Day,
        },
        QueryShape::GroupedAggregate {
            func: AggregateFn::Sum,
            value_column: "amount".into(),
            group_column: "category".into(),
        },
        QueryShape::GroupedCount {
            group_column: "category".into(),
        },
        QueryShape::CategoryComparison {
            value_column: "amount".into(),
            group_column: "category".into(),
        },
        QueryShape::Ratio {
            numerator: "revenue".into(),
            denominator: "cost".into(),
        },
        QueryShape::AnomalyRate {
            column: "amount".into(),
            lower: -48.5,
            upper: 149.5,
        },
        QueryShape::BinaryRate {
            column: "status".into(),
            value: "returned".into(),
        },
        QueryShape::SeasonalAverage {
            value_column: "amount".into(),
            time_column: "order_date".into(),
            cycle: heron::stats::SeasonalCycle::DayOfWeek,
        },
    ];
    for shape in shapes {
        let sql = build_query(&shape, "orders").to_sql();
        assert!(sql.ends_with(';'), "missing terminator: {sql}");
        assert_parses(&sql);
    }
}

#[test]
fn aggregate_sql_text_is_exact() {
    let sql = build_query(
        &QueryShape::Aggregate {
            func: AggregateFn::Sum,
            column: "amount".into(),
        },
        "orders",
    )
    .to_sql();
    assert_eq!(
        sql,
        "SELECT\n  SUM(\"amount\") AS \"sum_amount\"\nFROM \"orders\";"
    );
}

#[test]
fn grouped_aggregate_orders_by_the_aggregate_alias() {
    let sql = build_query(
        &QueryShape::GroupedAggregate {
            func: AggregateFn::Sum,
            value_column: "amount".into(),
            group_column: "category".into(),
        },
        "orders",
    )
    .to_sql();
    assert!(sql.contains("GROUP BY \"category\""));
    assert!(sql.contains("ORDER BY \"sum_amount\" DESC"));
}

#[test]
fn median_uses_percentile_cont_within_group() {
    let sql = build_query(
        &QueryShape::MeanMedian {
            column: "amount".into(),
        },
        "orders",
    )
    .to_sql();
    assert!(sql.contains("AVG(\"amount\") AS \"mean_amount\""));
    assert!(sql.contains(
        "PERCENTILE_CONT(0.5) WITHIN GROUP (ORDER BY \"amount\") AS \"median_amount\""
    ));
}

#[test]
fn growth_rate_builds_a_cte_with_lag() {
    let sql = build_query(
        &QueryShape::GrowthRate {
            value_column: "amount".into(),
            time_column: "order_date".into(),
            bucket: TimeBucket::Month,
        },
        "orders",
    )
    .to_sql();
    assert!(sql.starts_with("WITH \"periods\" AS ("));
    assert!(sql.contains("DATE_TRUNC('month', \"order_date\")"));
    assert!(sql.contains("LAG(\"total\") OVER (ORDER BY \"period\")"));
    assert!(sql.contains("FROM \"periods\""));
}

#[test]
fn share_of_total_uses_a_window_grand_total() {
    let sql = build_query(
        &QueryShape::ShareOfTotal {
            value_column: "amount".into(),
            group_column: "category".into(),
        },
        "orders",
    )
    .to_sql();
    assert!(sql.contains("SUM(SUM(\"amount\")) OVER ()"));
    assert!(sql.contains("ORDER BY \"share_pct\" DESC"));
}

#[test]
fn concentration_ranks_groups_by_total_descending() {
    let sql = build_query(
        &QueryShape::Concentration {
            value_column: "amount".into(),
            group_column: "category".into(),
        },
        "orders",
    )
    .to_sql();
    assert!(sql.contains("SUM(SUM(\"amount\")) OVER (ORDER BY SUM(\"amount\") DESC)"));
    assert!(sql.contains("AS \"cumulative_share_pct\""));
    assert!(sql.contains("ORDER BY \"total\" DESC"));
}

#[test]
fn record_concentration_ranks_records_by_value_descending() {
    let sql = build_query(
        &QueryShape::RecordConcentration {
            column: "amount".into(),
        },
        "orders",
    )
    .to_sql();
    assert!(sql.contains("SUM(\"amount\") OVER (ORDER BY \"amount\" DESC)"));
    assert!(sql.contains("SUM(\"amount\") OVER ()"));
    assert!(sql.contains("AS \"cumulative_share_pct\""));
    assert!(sql.contains("ORDER BY \"amount\" DESC"));
}

#[test]
fn embedded_quotes_in_identifiers_are_escaped() {
    let entry = render_entry(
        kpi_with(QueryShape::Aggregate {
            func: AggregateFn::Sum,
            column: "amount".into(),
        }),
        "weird\"table",
    );
    assert!(entry.sql_text.contains("\"weird\"\"table\""));
}

#[test]
fn string_literals_escape_single_quotes() {
    let sql = build_query(
        &QueryShape::BinaryRate {
            column: "status".into(),
            value: "won't ship".into(),
        },
        "orders",
    )
    .to_sql();
    assert!(sql.contains("'won''t ship'"));
}

#[test]
fn chart_suggestions_follow_the_shape() {
    let cases: Vec<(QueryShape, ChartType)> = vec![
        (QueryShape::RecordCount, ChartType::Bar),
        (
            QueryShape::GroupedCount {
                group_column: "category".into(),
            },
            ChartType::Bar,
        ),
        (
            QueryShape::TimeBucketAggregate {
                func: AggregateFn::Sum,
                value_column: "amount".into(),
                time_column: "order_date".into(),
                bucket: TimeBucket::Day,
            },
            ChartType::Line,
        ),
        (
            QueryShape::Percentile {
                column: "amount".into(),
                fraction: 0.25,
            },
            ChartType::Histogram,
        ),
        (
            QueryShape::AnomalyRate {
                column: "amount".into(),
                lower: 0.0,
                upper: 1.0,
            },
            ChartType::BoxPlot,
        ),
        (
            QueryShape::SeasonalAverage {
                value_column: "amount".into(),
                time_column: "order_date".into(),
                cycle: heron::stats::SeasonalCycle::MonthOfYear,
            },
            ChartType::Heatmap,
        ),
        (
            QueryShape::Concentration {
                value_column: "amount".into(),
                group_column: "category".into(),
            },
            ChartType::ParetoCombo,
        ),
        (
            QueryShape::RecordConcentration {
                column: "amount".into(),
            },
            ChartType::ParetoCombo,
        ),
    ];
    for (shape, chart) in cases {
        let entry = render_entry(kpi_with(shape), "orders");
        assert_eq!(entry.chart, chart);
    }
}
