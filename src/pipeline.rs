//! End-to-end pipeline: dataset in, ranked KPI catalog out.

use tracing::debug;

use crate::catalog::Catalog;
use crate::config::PipelineConfig;
use crate::dataset::Dataset;
use crate::refine::TextRefiner;
use crate::{quality, refine, render, rules, schema, stats};

/// Run the full pipeline with templated text.
pub fn run(dataset: &Dataset, config: &PipelineConfig) -> Catalog {
    let profiles = schema::infer(dataset, config);
    debug!(columns = profiles.len(), "schema inference complete");

    let analysis = stats::analyze(dataset, &profiles, config);
    debug!(
        relationships = analysis.relationships.len(),
        findings = analysis.findings.len(),
        "analytics complete"
    );

    let quality = quality::assess(dataset, &analysis.profiles, config);
    debug!(overall = quality.overall, "quality assessment complete");

    let kpis = rules::generate(&analysis, config);
    debug!(kpis = kpis.len(), "rule engine complete");

    render::render_catalog(kpis, analysis, quality, config)
}

/// Run the pipeline and pass the catalog text through a refiner.
pub fn run_with_refiner(
    dataset: &Dataset,
    config: &PipelineConfig,
    refiner: &dyn TextRefiner,
) -> Catalog {
    let mut catalog = run(dataset, config);
    refine::refine_catalog(&mut catalog, refiner);
    catalog
}
