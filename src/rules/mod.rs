//! KPI rule engine.
//!
//! Five rule families run in a fixed order over the analysis output, each
//! emitting zero or more `KpiDefinition`s. Families never see each
//! other's output; deduplication and ranking happen here, after all
//! families have run.

pub mod aggregation;
pub mod category;
pub mod creative;
pub mod statistical;
pub mod time_series;

use std::collections::HashSet;

use crate::catalog::KpiDefinition;
use crate::config::PipelineConfig;
use crate::stats::Analysis;

use inflector::Inflector;

/// Run every rule family, deduplicate by id, and rank.
///
/// When two rules emit the same id the earlier family wins. Ranking is
/// by confidence descending, then family priority, then id, so the
/// output order is fully deterministic.
pub fn generate(analysis: &Analysis, config: &PipelineConfig) -> Vec<KpiDefinition> {
    let mut kpis = Vec::new();
    kpis.extend(aggregation::generate(analysis));
    kpis.extend(time_series::generate(analysis));
    kpis.extend(category::generate(analysis));
    kpis.extend(statistical::generate(analysis));
    kpis.extend(creative::generate(analysis, config));

    let mut seen = HashSet::new();
    kpis.retain(|kpi| seen.insert(kpi.id.clone()));

    kpis.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.category.priority().cmp(&b.category.priority()))
            .then_with(|| a.id.cmp(&b.id))
    });
    kpis
}

/// Human-readable form of a column name: "order_amount" becomes
/// "Order Amount".
pub(crate) fn humanize(column: &str) -> String {
    column.to_title_case()
}
