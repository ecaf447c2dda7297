//! End-to-end pipeline: Reader -> Normalizer -> Extractor -> Scorer
//!
//! One pipeline instance serves many concurrent invocations: per-request
//! state lives entirely in the arguments, while the expensive shared
//! resources (model-tier client, embedding backend) are constructed or
//! lazily initialized once and shared read-only.

use crate::config::Config;
use crate::embedding::LazyEmbeddings;
use crate::error::{Result, ResumeScorerError};
use crate::extractor::heuristic::HeuristicExtractor;
use crate::extractor::model_tier::ModelClient;
use crate::extractor::requirement::JobRequirementExtractor;
use crate::extractor::{CandidateProfile, ExtractionOutcome, FieldExtractor};
use crate::reader::{DocumentReader, RawDocument};
use crate::scoring::semantic::SemanticScorer;
use crate::scoring::{JobRequirement, ScoringEngine, ScoringResult};
use crate::text::{NormalizedText, TextNormalizer};
use log::info;
use serde::Serialize;
use std::sync::Arc;

/// The full evaluation of one resume against one job.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub profile: CandidateProfile,
    pub result: ScoringResult,
}

pub struct Pipeline {
    reader: Arc<DocumentReader>,
    normalizer: TextNormalizer,
    extractor: FieldExtractor,
    requirement_extractor: JobRequirementExtractor,
    scorer: ScoringEngine,
}

impl Pipeline {
    pub fn new(config: &Config) -> Self {
        let api_key = config.model_tier_api_key();
        if api_key.is_none() {
            info!(
                "{} not set, model tier disabled for this process",
                config.model_tier.api_key_env
            );
        }
        let model = ModelClient::from_config(&config.model_tier, api_key).map(Arc::new);
        let heuristic = Arc::new(HeuristicExtractor::new());
        let embeddings = Arc::new(LazyEmbeddings::new(&config.embedding));

        Self {
            reader: Arc::new(DocumentReader::new(&config.reader)),
            normalizer: TextNormalizer::new(config.text.min_length),
            extractor: FieldExtractor::new(model.clone(), Arc::clone(&heuristic)),
            requirement_extractor: JobRequirementExtractor::new(model, heuristic),
            scorer: ScoringEngine::new(
                config.scoring.clone(),
                SemanticScorer::new(embeddings, config.embedding.max_chars),
            ),
        }
    }

    /// Read and normalize a document. These are the only stages that can
    /// fail; everything downstream degrades instead.
    pub async fn ingest(&self, document: RawDocument) -> Result<NormalizedText> {
        let reader = Arc::clone(&self.reader);
        // OCR can block for a long time; keep it off the async executor.
        let raw = tokio::task::spawn_blocking(move || reader.read(&document))
            .await
            .map_err(|e| {
                ResumeScorerError::ExtractionFailed(format!("reader task failed: {}", e))
            })??;
        self.normalizer.normalize(&raw)
    }

    pub async fn extract(&self, text: &NormalizedText) -> ExtractionOutcome {
        self.extractor.extract(text).await
    }

    /// Parse free job-description text into a structured requirement.
    pub async fn parse_requirement(&self, jd_text: &str) -> JobRequirement {
        self.requirement_extractor.extract(jd_text).await
    }

    pub fn score(
        &self,
        profile: &CandidateProfile,
        text: &NormalizedText,
        requirement: &JobRequirement,
    ) -> ScoringResult {
        self.scorer.score(profile, text.as_str(), requirement)
    }

    /// Run the whole pipeline for one (document, requirement) pair.
    pub async fn evaluate(
        &self,
        document: RawDocument,
        requirement: &JobRequirement,
    ) -> Result<Evaluation> {
        let text = self.ingest(document).await?;
        let profile = self.extract(&text).await.into_profile();
        let result = self.score(&profile, &text, requirement);
        Ok(Evaluation { profile, result })
    }
}
