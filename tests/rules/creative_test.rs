//! Insight and action text produced by the finding-driven rules, checked
//! through the full rule engine.

use chrono::{Days, NaiveDate};
use heron::catalog::{KpiCategory, QueryShape};
use heron::config::PipelineConfig;
use heron::dataset::{Column, Dataset, Value};
use heron::rules;
use heron::schema;
use heron::stats::{self, Analysis};

fn analyze(dataset: &Dataset) -> Analysis {
    let config = PipelineConfig::default();
    let profiles = schema::infer(dataset, &config);
    stats::analyze(dataset, &profiles, &config)
}

fn creative_kpis(dataset: &Dataset) -> Vec<heron::catalog::KpiDefinition> {
    rules::generate(&analyze(dataset), &PipelineConfig::default())
        .into_iter()
        .filter(|k| k.category == KpiCategory::Creative)
        .collect()
}

#[test]
fn anomaly_kpi_reports_flagged_count_in_its_insight() {
    let mut values: Vec<Value> = (0..200)
        .map(|i| Value::Float(50.0 + (i % 10) as f64))
        .collect();
    values.extend([
        Value::Float(10_000.0),
        Value::Float(12_000.0),
        Value::Float(15_000.0),
    ]);
    let dataset = Dataset::new(vec![Column::new("amount", values)]).unwrap();
    let kpis = creative_kpis(&dataset);
    let anomaly = kpis
        .iter()
        .find(|k| matches!(k.query, QueryShape::AnomalyRate { .. }))
        .unwrap();
    assert_eq!(anomaly.title, "Amount Anomaly Rate");
    let insight = anomaly.insight.as_deref().unwrap();
    assert!(insight.starts_with("3 values"));
    assert!(insight.contains("standard deviations"));
    assert!(anomaly.action.is_some());
}

#[test]
fn gap_kpi_quantifies_the_gap_and_half_gap_uplift() {
    let regions: Vec<Value> = (0..60)
        .map(|i| Value::Text(if i % 2 == 0 { "north" } else { "south" }.into()))
        .collect();
    let amounts: Vec<Value> = (0..60)
        .map(|i| Value::Float(if i % 2 == 0 { 200.0 } else { 100.0 }))
        .collect();
    let dataset = Dataset::new(vec![
        Column::new("region", regions),
        Column::new("amount", amounts),
    ])
    .unwrap();
    let kpis = creative_kpis(&dataset);
    let gap = kpis
        .iter()
        .find(|k| matches!(k.query, QueryShape::CategoryComparison { .. }))
        .unwrap();
    let insight = gap.insight.as_deref().unwrap();
    assert!(insight.contains("'north' averages 200.00"));
    assert!(insight.contains("a 100% gap"));
    // The median of the group means is 150, so half the gap to it is a
    // 25% lift for the bottom group.
    assert!(gap.action.as_deref().unwrap().contains("roughly 25%"));
}

#[test]
fn significant_growth_produces_a_trend_kpi() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates: Vec<Value> = (0..40)
        .map(|i| Value::Text((start + Days::new(i)).format("%Y-%m-%d").to_string()))
        .collect();
    let amounts: Vec<Value> = (0..40).map(|i| Value::Float(100.0 + 10.0 * i as f64)).collect();
    let dataset = Dataset::new(vec![
        Column::new("order_date", dates),
        Column::new("amount", amounts),
    ])
    .unwrap();
    let kpis = creative_kpis(&dataset);
    let trend = kpis.iter().find(|k| k.title == "Amount Trend").unwrap();
    let insight = trend.insight.as_deref().unwrap();
    assert!(insight.contains("grew"));
    assert!(trend.action.as_deref().unwrap().contains("growth"));
}

#[test]
fn seasonality_kpi_names_peak_and_trough() {
    // 2024-01-01 is a Monday; weekends carry 10x the weekday value.
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut dates = Vec::new();
    let mut amounts = Vec::new();
    for i in 0..70u64 {
        dates.push(Value::Text((start + Days::new(i)).format("%Y-%m-%d").to_string()));
        amounts.push(Value::Float(if i % 7 >= 5 { 200.0 } else { 20.0 }));
    }
    let dataset = Dataset::new(vec![
        Column::new("order_date", dates),
        Column::new("amount", amounts),
    ])
    .unwrap();
    let kpis = creative_kpis(&dataset);
    let weekly = kpis
        .iter()
        .find(|k| {
            matches!(
                &k.query,
                QueryShape::SeasonalAverage {
                    cycle: heron::stats::SeasonalCycle::DayOfWeek,
                    ..
                }
            )
        })
        .unwrap();
    let insight = weekly.insight.as_deref().unwrap();
    assert!(insight.contains("peaks on"));
    assert!(insight.contains("bottoms out on"));
}

#[test]
fn spread_out_concentration_is_not_reported() {
    // Five evenly sized groups need 80% of themselves to reach the target,
    // well past the alert cutoff.
    let categories: Vec<Value> = (0..100)
        .map(|i| Value::Text(format!("group_{}", i % 5)))
        .collect();
    let amounts: Vec<Value> = (0..100).map(|_| Value::Float(10.0)).collect();
    let dataset = Dataset::new(vec![
        Column::new("segment", categories),
        Column::new("amount", amounts),
    ])
    .unwrap();
    let kpis = creative_kpis(&dataset);
    assert!(!kpis
        .iter()
        .any(|k| matches!(k.query, QueryShape::Concentration { .. })));
    assert!(!kpis
        .iter()
        .any(|k| matches!(k.query, QueryShape::RecordConcentration { .. })));
}

#[test]
fn dominant_records_get_a_concentration_kpi_without_groups() {
    let mut values: Vec<Value> = vec![Value::Float(2.0); 60];
    values.push(Value::Float(50_000.0));
    let dataset = Dataset::new(vec![Column::new("revenue", values)]).unwrap();
    let kpis = creative_kpis(&dataset);
    let conc = kpis
        .iter()
        .find(|k| matches!(k.query, QueryShape::RecordConcentration { .. }))
        .unwrap();
    assert_eq!(conc.title, "Revenue Concentration");
    assert!(conc
        .insight
        .as_deref()
        .unwrap()
        .contains("% of records account for"));
}

#[test]
fn skewed_column_gets_a_mean_vs_median_kpi() {
    // Mostly small values with a heavy upper tail.
    let mut values: Vec<Value> = (0..95).map(|i| Value::Float(10.0 + (i % 5) as f64)).collect();
    values.extend((0..5).map(|i| Value::Float(5_000.0 + i as f64)));
    let dataset = Dataset::new(vec![Column::new("amount", values)]).unwrap();
    let kpis = creative_kpis(&dataset);
    let skew = kpis
        .iter()
        .find(|k| matches!(k.query, QueryShape::MeanMedian { .. }))
        .unwrap();
    assert!(skew.insight.as_deref().unwrap().contains("skewed toward high"));
    let variability = kpis
        .iter()
        .find(|k| matches!(k.query, QueryShape::VariabilityRatio { .. }))
        .unwrap();
    assert!(variability.insight.as_deref().unwrap().contains("varies widely"));
}
