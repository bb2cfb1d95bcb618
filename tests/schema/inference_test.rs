//! Role inference over realistic mixed-column datasets.

use heron::config::PipelineConfig;
use heron::dataset::{Column, Dataset, Value};
use heron::schema::{self, Role};

fn orders_dataset() -> Dataset {
    let n = 50;
    let order_id: Vec<Value> = (1..=n as i64).map(Value::Int).collect();
    let order_date: Vec<Value> = (0..n)
        .map(|i| Value::Text(format!("2024-{:02}-{:02}", i / 28 + 1, i % 28 + 1)))
        .collect();
    let category: Vec<Value> = (0..n)
        .map(|i| {
            Value::Text(
                ["widgets", "gadgets", "gizmos"][i % 3].to_string(),
            )
        })
        .collect();
    let amount: Vec<Value> = (0..n).map(|i| Value::Float(9.99 + i as f64 * 3.5)).collect();
    Dataset::new(vec![
        Column::new("order_id", order_id),
        Column::new("order_date", order_date),
        Column::new("category", category),
        Column::new("amount", amount),
    ])
    .unwrap()
}

fn role_of(dataset: &Dataset, name: &str) -> Role {
    let profiles = schema::infer(dataset, &PipelineConfig::default());
    profiles.iter().find(|p| p.name == name).unwrap().role
}

#[test]
fn classifies_the_four_standard_roles() {
    let dataset = orders_dataset();
    assert_eq!(role_of(&dataset, "order_id"), Role::Identifier);
    assert_eq!(role_of(&dataset, "order_date"), Role::Datetime);
    assert_eq!(role_of(&dataset, "category"), Role::Categorical);
    assert_eq!(role_of(&dataset, "amount"), Role::Numeric);
}

#[test]
fn free_text_falls_back_to_text_role() {
    let notes: Vec<Value> = (0..80)
        .map(|i| Value::Text(format!("customer called about issue number {i} on their account")))
        .collect();
    let dataset = Dataset::new(vec![Column::new("notes", notes)]).unwrap();
    // High cardinality, no identifier pattern, no dates, not numeric.
    assert_eq!(role_of(&dataset, "notes"), Role::Text);
}

#[test]
fn numeric_column_of_plausible_years_stays_numeric_without_name_hint() {
    // Values like 1995, 2003... could be years, but the column is not
    // named like a date, so they classify as numeric (or identifier when
    // unique). Repeats prevent the identifier path here.
    let values: Vec<Value> = (0..60).map(|i| Value::Int(1990 + (i % 20))).collect();
    let dataset = Dataset::new(vec![Column::new("score", values)]).unwrap();
    assert_eq!(role_of(&dataset, "score"), Role::Numeric);
}

#[test]
fn bare_years_with_date_name_hint_become_datetime() {
    let values: Vec<Value> = (0..60).map(|i| Value::Int(1990 + (i % 20))).collect();
    let dataset = Dataset::new(vec![Column::new("fiscal_year", values)]).unwrap();
    assert_eq!(role_of(&dataset, "fiscal_year"), Role::Datetime);
}

#[test]
fn uuid_values_classify_as_identifier() {
    let values: Vec<Value> = (0..40)
        .map(|i| {
            Value::Text(format!(
                "550e8400-e29b-41d4-a716-4466554400{:02}",
                i
            ))
        })
        .collect();
    let dataset = Dataset::new(vec![Column::new("token", values)]).unwrap();
    assert_eq!(role_of(&dataset, "token"), Role::Identifier);
}

#[test]
fn missing_ratio_is_reported() {
    let mut values: Vec<Value> = (0..40).map(|i| Value::Float(i as f64)).collect();
    for v in values.iter_mut().take(10) {
        *v = Value::Null;
    }
    let dataset = Dataset::new(vec![Column::new("amount", values)]).unwrap();
    let profiles = schema::infer(&dataset, &PipelineConfig::default());
    let amount = &profiles[0];
    assert!((amount.missing_ratio - 0.25).abs() < 1e-12);
}

#[test]
fn categorical_summary_lists_top_values_by_count() {
    let dataset = orders_dataset();
    let profiles = schema::infer(&dataset, &PipelineConfig::default());
    let category = profiles.iter().find(|p| p.name == "category").unwrap();
    let summary = category.categorical.as_ref().unwrap();
    assert!(!summary.top_values.is_empty());
    // 50 rows cycling over 3 values: counts are 17, 17, 16.
    let counts: Vec<usize> = summary.top_values.iter().map(|(_, c)| *c).collect();
    assert_eq!(counts.iter().sum::<usize>(), 50);
    for pair in counts.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[test]
fn all_missing_column_is_text() {
    let values: Vec<Value> = (0..20).map(|_| Value::Null).collect();
    let dataset = Dataset::new(vec![Column::new("empty", values)]).unwrap();
    assert_eq!(role_of(&dataset, "empty"), Role::Text);
}
