//! Quality assessment over full datasets.

use heron::config::PipelineConfig;
use heron::dataset::{Column, Dataset, Value};
use heron::quality::{self, QualityReport};
use heron::schema;

fn assess(dataset: &Dataset) -> QualityReport {
    let config = PipelineConfig::default();
    let profiles = schema::infer(dataset, &config);
    quality::assess(dataset, &profiles, &config)
}

#[test]
fn clean_dataset_scores_near_perfect() {
    let dataset = Dataset::new(vec![
        Column::new("order_id", (1..=100i64).map(Value::Int).collect()),
        Column::new(
            "order_date",
            (0..100)
                .map(|i| Value::Text(format!("2024-{:02}-{:02}", i / 28 + 1, i % 28 + 1)))
                .collect(),
        ),
        Column::new(
            "amount",
            (0..100).map(|i| Value::Float(50.0 + i as f64)).collect(),
        ),
    ])
    .unwrap();
    let report = assess(&dataset);
    assert!((report.completeness - 1.0).abs() < 1e-12);
    assert!((report.uniqueness - 1.0).abs() < 1e-12);
    assert!((report.consistency - 1.0).abs() < 1e-12);
    assert!((report.validity - 1.0).abs() < 1e-12);
    assert!(report.overall > 0.95);
    assert!(report.issues.is_empty());
    assert!(report.recommendations.is_empty());
}

#[test]
fn heavily_missing_column_is_called_out() {
    let mut amounts: Vec<Value> = (0..40).map(|i| Value::Float(i as f64)).collect();
    for v in amounts.iter_mut().take(12) {
        *v = Value::Null;
    }
    let labels: Vec<Value> = (0..40)
        .map(|i| Value::Text(["a", "b"][i % 2].to_string()))
        .collect();
    let dataset = Dataset::new(vec![
        Column::new("label", labels),
        Column::new("amount", amounts),
    ])
    .unwrap();
    let report = assess(&dataset);
    // 30% missing in one of two columns.
    assert!((report.completeness - 0.85).abs() < 1e-12);
    assert!(report.issues.iter().any(|i| i.contains("'amount'")));
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.contains("Backfill or drop")));
}

#[test]
fn duplicate_rows_lower_uniqueness_proportionally() {
    // 20 distinct rows, each appearing twice.
    let labels: Vec<Value> = (0..40)
        .map(|i| Value::Text(format!("row_{}", i % 20)))
        .collect();
    let dataset = Dataset::new(vec![Column::new("label", labels)]).unwrap();
    let report = assess(&dataset);
    assert!((report.uniqueness - 0.5).abs() < 1e-12);
    assert!(report.issues.iter().any(|i| i.contains("20 exact duplicate rows")));
}

#[test]
fn repeated_identifier_values_are_flagged() {
    // Unique enough to classify as an identifier, but with one repeat.
    let mut ids: Vec<Value> = (1..=50i64).map(Value::Int).collect();
    ids[49] = Value::Int(1);
    let amounts: Vec<Value> = (0..50).map(|i| Value::Float(10.0 + i as f64)).collect();
    let dataset = Dataset::new(vec![
        Column::new("order_id", ids),
        Column::new("amount", amounts),
    ])
    .unwrap();
    let report = assess(&dataset);
    assert!(report
        .issues
        .iter()
        .any(|i| i.contains("Identifier column 'order_id' repeats values")));
}

#[test]
fn implausible_years_lower_validity() {
    let mut dates: Vec<Value> = (1..=28)
        .map(|d| Value::Text(format!("2024-02-{d:02}")))
        .collect();
    dates.push(Value::Text("0099-01-01".into()));
    dates.push(Value::Text("2500-01-01".into()));
    let dataset = Dataset::new(vec![Column::new("order_date", dates)]).unwrap();
    let report = assess(&dataset);
    assert!((report.validity - 28.0 / 30.0).abs() < 1e-12);
    assert!(report.issues.iter().any(|i| i.contains("1900-2100")));
}

#[test]
fn extreme_values_lower_accuracy() {
    let mut amounts: Vec<Value> = (0..200)
        .map(|i| Value::Float(50.0 + (i % 10) as f64))
        .collect();
    amounts.extend([
        Value::Float(10_000.0),
        Value::Float(12_000.0),
        Value::Float(15_000.0),
    ]);
    let dataset = Dataset::new(vec![Column::new("amount", amounts)]).unwrap();
    let report = assess(&dataset);
    let expected = 1.0 - 3.0 / 203.0;
    assert!((report.accuracy - expected).abs() < 1e-12);
    assert!(report.issues.iter().any(|i| i.contains("3 extreme values")));
}

#[test]
fn overall_is_the_weighted_combination() {
    let dataset = Dataset::new(vec![Column::new(
        "amount",
        (0..30).map(|i| Value::Float(i as f64)).collect(),
    )])
    .unwrap();
    let report = assess(&dataset);
    let expected = report.completeness * 0.25
        + report.uniqueness * 0.15
        + report.consistency * 0.20
        + report.validity * 0.20
        + report.accuracy * 0.20;
    assert!((report.overall - expected).abs() < 1e-12);
}
