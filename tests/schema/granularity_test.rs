//! Datetime granularity inference and the time buckets it permits.

use heron::config::PipelineConfig;
use heron::dataset::{Column, Dataset, Value};
use heron::schema::{self, Granularity, TimeBucket};

fn granularity_of(dates: Vec<Value>) -> Granularity {
    let dataset = Dataset::new(vec![Column::new("event_date", dates)]).unwrap();
    let profiles = schema::infer(&dataset, &PipelineConfig::default());
    profiles[0].datetime.as_ref().unwrap().granularity
}

#[test]
fn january_firsts_are_year_grained() {
    let dates: Vec<Value> = (0..30)
        .map(|i| Value::Text(format!("{}-01-01", 1990 + i)))
        .collect();
    assert_eq!(granularity_of(dates), Granularity::Year);
}

#[test]
fn month_starts_are_month_grained() {
    let dates: Vec<Value> = (0..36)
        .map(|i| Value::Text(format!("{}-{:02}-01", 2020 + i / 12, i % 12 + 1)))
        .collect();
    assert_eq!(granularity_of(dates), Granularity::Month);
}

#[test]
fn varying_days_are_day_grained() {
    let dates: Vec<Value> = (0..40)
        .map(|i| Value::Text(format!("2024-03-{:02}", i % 28 + 1)))
        .collect();
    assert_eq!(granularity_of(dates), Granularity::Day);
}

#[test]
fn intra_day_timestamps_are_finer_grained() {
    let dates: Vec<Value> = (0..40)
        .map(|i| Value::Text(format!("2024-03-05 {:02}:30:00", i % 24)))
        .collect();
    assert_eq!(granularity_of(dates), Granularity::Finer);
}

#[test]
fn year_granularity_only_allows_yearly_buckets() {
    assert_eq!(Granularity::Year.buckets(), &[TimeBucket::Year]);
}

#[test]
fn month_granularity_allows_month_and_year() {
    assert_eq!(
        Granularity::Month.buckets(),
        &[TimeBucket::Month, TimeBucket::Year]
    );
}

#[test]
fn day_and_finer_allow_all_buckets() {
    let all = &[TimeBucket::Day, TimeBucket::Month, TimeBucket::Year];
    assert_eq!(Granularity::Day.buckets(), all);
    assert_eq!(Granularity::Finer.buckets(), all);
}

#[test]
fn month_only_strings_parse_to_month_granularity() {
    let dates: Vec<Value> = (0..24)
        .map(|i| Value::Text(format!("{}-{:02}", 2023 + i / 12, i % 12 + 1)))
        .collect();
    assert_eq!(granularity_of(dates), Granularity::Month);
}
