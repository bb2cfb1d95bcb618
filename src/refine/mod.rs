//! Optional text refinement for generated KPI prose.
//!
//! The pipeline's titles and insights are templated. A `TextRefiner`
//! implementation can rewrite them (a human editor, a language model
//! behind an API, a glossary substitution). Refinement is best-effort:
//! a failing refiner leaves the entry's original text in place and the
//! catalog still ships.

use thiserror::Error;
use tracing::warn;

use crate::catalog::Catalog;

#[derive(Debug, Error)]
pub enum RefineError {
    #[error("refiner unavailable: {0}")]
    Unavailable(String),
    #[error("refiner rejected input: {0}")]
    Rejected(String),
}

/// The text fields of one KPI a refiner may rewrite.
#[derive(Debug, Clone)]
pub struct RefinedText {
    pub title: String,
    pub description: String,
    pub insight: Option<String>,
    pub action: Option<String>,
}

/// Rewrites KPI prose. Implementations must not change the meaning of
/// the underlying metric; only the wording.
pub trait TextRefiner {
    fn refine(&self, text: &RefinedText) -> Result<RefinedText, RefineError>;
}

/// Apply a refiner to every entry, keeping original text on failure.
pub fn refine_catalog(catalog: &mut Catalog, refiner: &dyn TextRefiner) {
    for entry in &mut catalog.entries {
        let current = RefinedText {
            title: entry.kpi.title.clone(),
            description: entry.kpi.description.clone(),
            insight: entry.kpi.insight.clone(),
            action: entry.kpi.action.clone(),
        };
        match refiner.refine(&current) {
            Ok(refined) => {
                entry.kpi.title = refined.title;
                entry.kpi.description = refined.description;
                entry.kpi.insight = refined.insight;
                entry.kpi.action = refined.action;
            }
            Err(err) => {
                warn!(kpi = %entry.kpi.id, error = %err, "text refinement failed, keeping original");
            }
        }
    }
}
