//! Two-tier structured field extraction
//!
//! The model tier is primary; any failure there routes to the
//! deterministic heuristic tier, which always succeeds. The extractor as a
//! whole is therefore total: given normalized text it always produces a
//! profile, tagged with the tier that built it.

pub mod heuristic;
pub mod model_tier;
pub mod name;
pub mod profile;
pub mod requirement;

pub use profile::{CandidateProfile, ExtractionMethod};

use crate::text::NormalizedText;
use heuristic::HeuristicExtractor;
use log::{info, warn};
use model_tier::ModelClient;
use std::sync::Arc;

/// Which tier produced the profile, carrying the profile itself.
#[derive(Debug, Clone)]
pub enum ExtractionOutcome {
    Model(CandidateProfile),
    Heuristic(CandidateProfile),
}

impl ExtractionOutcome {
    pub fn method(&self) -> ExtractionMethod {
        match self {
            ExtractionOutcome::Model(_) => ExtractionMethod::Model,
            ExtractionOutcome::Heuristic(_) => ExtractionMethod::Heuristic,
        }
    }

    pub fn profile(&self) -> &CandidateProfile {
        match self {
            ExtractionOutcome::Model(profile) | ExtractionOutcome::Heuristic(profile) => profile,
        }
    }

    pub fn into_profile(self) -> CandidateProfile {
        match self {
            ExtractionOutcome::Model(profile) | ExtractionOutcome::Heuristic(profile) => profile,
        }
    }
}

pub struct FieldExtractor {
    model: Option<Arc<ModelClient>>,
    heuristic: Arc<HeuristicExtractor>,
}

impl FieldExtractor {
    pub fn new(model: Option<Arc<ModelClient>>, heuristic: Arc<HeuristicExtractor>) -> Self {
        if model.is_none() {
            info!("model tier unavailable, all extractions will use the heuristic tier");
        }
        Self { model, heuristic }
    }

    /// Extractor with the model tier disabled.
    pub fn heuristic_only() -> Self {
        Self::new(None, Arc::new(HeuristicExtractor::new()))
    }

    /// Extract a candidate profile. Never fails: model-tier errors degrade
    /// to the heuristic tier rather than propagating.
    pub async fn extract(&self, text: &NormalizedText) -> ExtractionOutcome {
        if let Some(client) = &self.model {
            match client.extract(text.as_str()).await {
                Ok(profile) => return ExtractionOutcome::Model(profile),
                Err(e) => warn!("model tier failed, falling back to heuristic: {}", e),
            }
        }

        ExtractionOutcome::Heuristic(self.heuristic.extract(text.as_str()))
    }
}
