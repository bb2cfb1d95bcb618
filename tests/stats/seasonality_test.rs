//! Seasonality detection through the full analysis pass.

use chrono::{Days, NaiveDate};
use heron::config::PipelineConfig;
use heron::dataset::{Column, Dataset, Value};
use heron::schema;
use heron::stats::{self, Finding, SeasonalCycle, SeasonalityFinding};

fn weekend_dataset(days: usize) -> Dataset {
    // 2024-01-01 is a Monday; weekends carry 10x the weekday value.
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut dates = Vec::new();
    let mut amounts = Vec::new();
    for i in 0..days {
        let d = start + Days::new(i as u64);
        dates.push(Value::Text(d.format("%Y-%m-%d").to_string()));
        let v = if i % 7 >= 5 { 200.0 } else { 20.0 };
        amounts.push(Value::Float(v));
    }
    Dataset::new(vec![
        Column::new("order_date", dates),
        Column::new("amount", amounts),
    ])
    .unwrap()
}

fn seasonality_findings(dataset: &Dataset) -> Vec<SeasonalityFinding> {
    let config = PipelineConfig::default();
    let profiles = schema::infer(dataset, &config);
    let analysis = stats::analyze(dataset, &profiles, &config);
    analysis
        .findings
        .iter()
        .filter_map(|f| match f {
            Finding::Seasonality(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn weekend_spike_yields_day_of_week_cycle() {
    let findings = seasonality_findings(&weekend_dataset(70));
    let weekly = findings
        .iter()
        .find(|f| f.cycle == SeasonalCycle::DayOfWeek)
        .unwrap();
    assert_eq!(weekly.value_column, "amount");
    assert_eq!(weekly.time_column, "order_date");
    // Saturday and Sunday tie at the peak; the earlier day wins.
    assert_eq!(weekly.peak, "Saturday");
    assert_eq!(weekly.trough, "Monday");
    assert!((weekly.peak_avg - 200.0).abs() < 1e-9);
    assert!((weekly.trough_avg - 20.0).abs() < 1e-9);
    assert_eq!(weekly.period_averages.len(), 7);
}

#[test]
fn period_averages_follow_calendar_order() {
    let findings = seasonality_findings(&weekend_dataset(70));
    let weekly = findings
        .iter()
        .find(|f| f.cycle == SeasonalCycle::DayOfWeek)
        .unwrap();
    let labels: Vec<&str> = weekly
        .period_averages
        .iter()
        .map(|(l, _)| l.as_str())
        .collect();
    assert_eq!(
        labels,
        [
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday"
        ]
    );
}

#[test]
fn short_series_produce_no_cycle() {
    // Below the 30-row default minimum.
    let findings = seasonality_findings(&weekend_dataset(20));
    assert!(findings.is_empty());
}

#[test]
fn flat_series_produce_no_cycle() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates: Vec<Value> = (0..60)
        .map(|i| Value::Text((start + Days::new(i)).format("%Y-%m-%d").to_string()))
        .collect();
    let amounts = vec![Value::Float(75.0); 60];
    let dataset = Dataset::new(vec![
        Column::new("order_date", dates),
        Column::new("amount", amounts),
    ])
    .unwrap();
    assert!(seasonality_findings(&dataset).is_empty());
}
