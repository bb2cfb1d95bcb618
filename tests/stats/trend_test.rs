//! Trend detection through the full analysis pass.

use chrono::{Days, NaiveDate};
use heron::config::PipelineConfig;
use heron::dataset::{Column, Dataset, Value};
use heron::schema;
use heron::stats::{self, Finding, TrendDirection};

fn dated_dataset(values: &[f64]) -> Dataset {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let dates: Vec<Value> = (0..values.len())
        .map(|i| {
            let d = start + Days::new(i as u64);
            Value::Text(d.format("%Y-%m-%d").to_string())
        })
        .collect();
    let amounts: Vec<Value> = values.iter().map(|v| Value::Float(*v)).collect();
    Dataset::new(vec![
        Column::new("order_date", dates),
        Column::new("amount", amounts),
    ])
    .unwrap()
}

fn trend_findings(dataset: &Dataset) -> Vec<heron::stats::TrendFinding> {
    let config = PipelineConfig::default();
    let profiles = schema::infer(dataset, &config);
    let analysis = stats::analyze(dataset, &profiles, &config);
    analysis
        .findings
        .iter()
        .filter_map(|f| match f {
            Finding::Trend(t) => Some(t.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn rising_daily_values_produce_a_significant_trend() {
    let values: Vec<f64> = (0..40).map(|i| 100.0 + 5.0 * i as f64).collect();
    let findings = trend_findings(&dated_dataset(&values));
    assert_eq!(findings.len(), 1);
    let t = &findings[0];
    assert_eq!(t.value_column, "amount");
    assert_eq!(t.time_column, "order_date");
    assert_eq!(t.direction, TrendDirection::Increasing);
    assert!(t.significant);
    assert!(t.slope > 0.0);
    assert!(t.r_squared > 0.9);
    assert!(t.second_half_avg > t.first_half_avg);
    assert!(t.change_pct.unwrap() > 0.0);
    assert_eq!(t.bucket_count, 40);
}

#[test]
fn falling_values_produce_a_decreasing_trend() {
    let values: Vec<f64> = (0..40).map(|i| 500.0 - 3.0 * i as f64).collect();
    let findings = trend_findings(&dated_dataset(&values));
    assert_eq!(findings[0].direction, TrendDirection::Decreasing);
    assert!(findings[0].change_pct.unwrap() < 0.0);
}

#[test]
fn flat_values_are_stable_and_insignificant() {
    let values = vec![250.0; 40];
    let findings = trend_findings(&dated_dataset(&values));
    assert_eq!(findings[0].direction, TrendDirection::Stable);
    assert!(!findings[0].significant);
    assert_eq!(findings[0].slope, 0.0);
}

#[test]
fn zero_first_half_suppresses_change_pct() {
    let mut values = vec![0.0; 20];
    values.extend(vec![10.0; 20]);
    let findings = trend_findings(&dated_dataset(&values));
    assert!(findings[0].change_pct.is_none());
}
