//! Statistical rule family: distribution and derived-measure KPIs.

use crate::catalog::{
    kpi_id, ComputedValue, KpiCategory, KpiDefinition, QueryShape, SourceColumn,
};
use crate::schema::{Role, TimeBucket};
use crate::stats::{Analysis, Finding};

use super::humanize;

const QUARTILES: [(f64, &str, &str); 3] = [
    (0.25, "p25", "25th Percentile"),
    (0.5, "p50", "Median"),
    (0.75, "p75", "75th Percentile"),
];

/// Name tokens too generic to pair columns on.
const GENERIC_TOKENS: [&str; 6] = ["total", "amount", "value", "num", "count", "sum"];

/// Keyword pairs that form a meaningful numerator/denominator ratio.
const COMPLEMENTARY_PAIRS: [(&str, &str); 6] = [
    ("revenue", "cost"),
    ("sales", "cost"),
    ("income", "expense"),
    ("profit", "revenue"),
    ("clicks", "impressions"),
    ("conversions", "clicks"),
];

pub fn generate(analysis: &Analysis) -> Vec<KpiDefinition> {
    let mut kpis = Vec::new();

    for profile in &analysis.profiles {
        if profile.role != Role::Numeric {
            continue;
        }
        let summary = match &profile.numeric {
            Some(s) => s,
            None => continue,
        };
        let pretty = humanize(&profile.name);
        for (fraction, tag, label) in QUARTILES {
            let value = match tag {
                "p25" => summary.percentiles.p25,
                "p50" => summary.median,
                _ => summary.percentiles.p75,
            };
            kpis.push(KpiDefinition {
                id: kpi_id(tag, &[&profile.name]),
                title: format!("{label} of {pretty}"),
                description: format!("{label} of the {} distribution", profile.name),
                category: KpiCategory::Statistical,
                source_columns: vec![SourceColumn::new(&profile.name, Role::Numeric)],
                computed_value: Some(ComputedValue::Scalar { value }),
                insight: None,
                action: None,
                confidence: 0.6,
                query: QueryShape::Percentile {
                    column: profile.name.clone(),
                    fraction,
                },
            });
        }
    }

    kpis.extend(ratio_kpis(analysis));
    kpis.extend(growth_kpis(analysis));
    kpis
}

fn ratio_kpis(analysis: &Analysis) -> Vec<KpiDefinition> {
    let numerics: Vec<&str> = analysis
        .profiles
        .iter()
        .filter(|p| p.role == Role::Numeric)
        .map(|p| p.name.as_str())
        .collect();

    let mut kpis = Vec::new();
    for (i, &left) in numerics.iter().enumerate() {
        for &right in numerics.iter().skip(i + 1) {
            let Some((numerator, denominator)) = ratio_pair(left, right) else {
                continue;
            };
            let num_pretty = humanize(numerator);
            let den_pretty = humanize(denominator);
            kpis.push(KpiDefinition {
                id: kpi_id("ratio", &[numerator, denominator]),
                title: format!("{num_pretty} to {den_pretty} Ratio"),
                description: format!(
                    "Total {numerator} divided by total {denominator}"
                ),
                category: KpiCategory::Statistical,
                source_columns: vec![
                    SourceColumn::new(numerator, Role::Numeric),
                    SourceColumn::new(denominator, Role::Numeric),
                ],
                computed_value: None,
                insight: None,
                action: None,
                confidence: 0.75,
                query: QueryShape::Ratio {
                    numerator: numerator.to_string(),
                    denominator: denominator.to_string(),
                },
            });
        }
    }
    kpis
}

/// Decide whether two column names form a ratio, and in which order.
/// Known complementary keywords set the direction; a shared specific
/// name token pairs them with the earlier column on top.
fn ratio_pair<'a>(left: &'a str, right: &'a str) -> Option<(&'a str, &'a str)> {
    let left_lower = left.to_lowercase();
    let right_lower = right.to_lowercase();

    for (num_kw, den_kw) in COMPLEMENTARY_PAIRS {
        if left_lower.contains(num_kw) && right_lower.contains(den_kw) {
            return Some((left, right));
        }
        if right_lower.contains(num_kw) && left_lower.contains(den_kw) {
            return Some((right, left));
        }
    }

    let left_tokens: Vec<&str> = left_lower.split('_').collect();
    let shared = right_lower.split('_').any(|token| {
        token.len() >= 3 && !GENERIC_TOKENS.contains(&token) && left_tokens.contains(&token)
    });
    if shared {
        Some((left, right))
    } else {
        None
    }
}

fn growth_kpis(analysis: &Analysis) -> Vec<KpiDefinition> {
    let mut kpis = Vec::new();
    for finding in &analysis.findings {
        let trend = match finding {
            Finding::Trend(t) => t,
            _ => continue,
        };
        if !trend.significant {
            continue;
        }
        let granularity = analysis
            .profiles
            .iter()
            .find(|p| p.name == trend.time_column)
            .and_then(|p| p.datetime.as_ref())
            .map(|d| d.granularity);
        let Some(granularity) = granularity else {
            continue;
        };
        let buckets = granularity.buckets();
        let bucket = if buckets.contains(&TimeBucket::Month) {
            TimeBucket::Month
        } else {
            match buckets.first() {
                Some(&b) => b,
                None => continue,
            }
        };
        let pretty = humanize(&trend.value_column);
        let insight = trend.change_pct.map(|pct| {
            format!(
                "{} changed {:.1}% between the first and second half of the period",
                pretty, pct
            )
        });
        kpis.push(KpiDefinition {
            id: kpi_id("growth_rate", &[&trend.value_column, &trend.time_column]),
            title: format!("{pretty} Growth Rate"),
            description: format!(
                "Period-over-period percent change of total {} by {}",
                trend.value_column,
                bucket.label().to_lowercase()
            ),
            category: KpiCategory::Statistical,
            source_columns: vec![
                SourceColumn::new(&trend.value_column, Role::Numeric),
                SourceColumn::new(&trend.time_column, Role::Datetime),
            ],
            computed_value: trend.change_pct.map(|pct| ComputedValue::Scalar { value: pct }),
            insight,
            action: None,
            confidence: 0.8,
            query: QueryShape::GrowthRate {
                value_column: trend.value_column.clone(),
                time_column: trend.time_column.clone(),
                bucket,
            },
        });
    }
    kpis
}
