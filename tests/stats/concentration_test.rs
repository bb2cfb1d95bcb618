//! Concentration analysis through the full analysis pass.

use heron::config::PipelineConfig;
use heron::dataset::{Column, Dataset, Value};
use heron::schema;
use heron::stats::{self, ConcentrationFinding, Finding};

fn grouped_dataset(rows: &[(&str, f64)]) -> Dataset {
    let categories: Vec<Value> = rows
        .iter()
        .map(|(c, _)| Value::Text(c.to_string()))
        .collect();
    let amounts: Vec<Value> = rows.iter().map(|(_, v)| Value::Float(*v)).collect();
    Dataset::new(vec![
        Column::new("category", categories),
        Column::new("amount", amounts),
    ])
    .unwrap()
}

fn concentration_findings(dataset: &Dataset) -> Vec<ConcentrationFinding> {
    let config = PipelineConfig::default();
    let profiles = schema::infer(dataset, &config);
    let analysis = stats::analyze(dataset, &profiles, &config);
    analysis
        .findings
        .iter()
        .filter_map(|f| match f {
            Finding::Concentration(c) => Some(c.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn dominant_group_yields_minimal_fraction() {
    // "whale" carries 90% of revenue across five groups.
    let mut rows = vec![("whale", 450.0), ("whale", 450.0)];
    for name in ["minnow_a", "minnow_b", "minnow_c", "minnow_d"] {
        rows.push((name, 25.0));
    }
    let findings = concentration_findings(&grouped_dataset(&rows));
    assert_eq!(findings.len(), 1);
    let c = &findings[0];
    assert_eq!(c.categorical, "category");
    assert_eq!(c.numeric, "amount");
    assert_eq!(c.group_count, 5);
    assert_eq!(c.top_group_count, 1);
    assert!((c.pareto_fraction - 0.2).abs() < 1e-12);
    assert_eq!(c.top_groups[0].0, "whale");
    assert!((c.top_groups[0].1 - 900.0).abs() < 1e-9);
    assert!((c.reached_share - 0.9).abs() < 1e-12);
}

#[test]
fn even_distribution_requires_most_groups() {
    let rows: Vec<(&str, f64)> = vec![
        ("a", 10.0),
        ("b", 10.0),
        ("c", 10.0),
        ("d", 10.0),
        ("e", 10.0),
        ("a", 10.0),
        ("b", 10.0),
        ("c", 10.0),
        ("d", 10.0),
        ("e", 10.0),
    ];
    let findings = concentration_findings(&grouped_dataset(&rows));
    let c = &findings[0];
    assert_eq!(c.top_group_count, 4);
    assert!((c.pareto_fraction - 0.8).abs() < 1e-12);
    assert!(c.reached_share >= 0.8);
}

#[test]
fn record_concentration_covers_numeric_only_datasets() {
    // No categorical column at all; the record-level Pareto still fires,
    // and a single dominant record reports exactly 1/row_count.
    let mut amounts: Vec<Value> = vec![Value::Float(0.5); 19];
    amounts.push(Value::Float(9_000.0));
    let dataset = Dataset::new(vec![Column::new("amount", amounts)]).unwrap();
    let config = PipelineConfig::default();
    let profiles = schema::infer(&dataset, &config);
    let analysis = stats::analyze(&dataset, &profiles, &config);
    let record = analysis
        .findings
        .iter()
        .find_map(|f| match f {
            Finding::RecordConcentration(c) => Some(c),
            _ => None,
        })
        .unwrap();
    assert_eq!(record.column, "amount");
    assert_eq!(record.record_count, 20);
    assert_eq!(record.top_record_count, 1);
    assert!((record.pareto_fraction - 0.05).abs() < 1e-12);
}

#[test]
fn missing_numeric_rows_are_ignored_in_totals() {
    let mut categories: Vec<Value> = Vec::new();
    let mut amounts: Vec<Value> = Vec::new();
    for _ in 0..5 {
        categories.push(Value::Text("big".into()));
        amounts.push(Value::Float(100.0));
    }
    for _ in 0..5 {
        categories.push(Value::Text("small".into()));
        amounts.push(Value::Float(10.0));
    }
    categories.push(Value::Text("small".into()));
    amounts.push(Value::Null);
    let dataset = Dataset::new(vec![
        Column::new("category", categories),
        Column::new("amount", amounts),
    ])
    .unwrap();
    let findings = concentration_findings(&dataset);
    let c = &findings[0];
    assert_eq!(c.group_count, 2);
    assert_eq!(c.top_groups[0].0, "big");
    assert!((c.top_groups[0].1 - 500.0).abs() < 1e-9);
}
