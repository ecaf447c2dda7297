//! Text embeddings for semantic similarity scoring

use crate::config::EmbeddingConfig;
use crate::error::{Result, ResumeScorerError};
use log::info;
use model2vec_rs::model::StaticModel;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;

/// Model2Vec static embedding model. Expensive to construct; hold one per
/// process behind [`LazyEmbeddings`].
pub struct EmbeddingEngine {
    model: StaticModel,
}

impl EmbeddingEngine {
    pub fn load(model_dir: &Path) -> Result<Self> {
        let start = Instant::now();
        let model = StaticModel::from_pretrained(model_dir, None, None, None).map_err(|e| {
            ResumeScorerError::Embedding(format!(
                "failed to load embedding model from {}: {}",
                model_dir.display(),
                e
            ))
        })?;
        info!(
            "embedding model loaded from {} in {:.2?}",
            model_dir.display(),
            start.elapsed()
        );
        Ok(Self { model })
    }

    pub fn encode(&self, text: &str) -> Vec<f32> {
        self.model.encode_single(text)
    }
}

/// Cosine similarity between two embedding vectors. Mismatched dimensions
/// or zero-norm vectors yield 0.0 rather than an error.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Process-wide lazily-initialized embedding backend.
///
/// First use loads the model exactly once, even under racing concurrent
/// callers; a load failure is cached so subsequent calls report
/// unavailability without retrying the load.
pub struct LazyEmbeddings {
    model_dir: PathBuf,
    cell: OnceLock<std::result::Result<EmbeddingEngine, String>>,
}

impl LazyEmbeddings {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            model_dir: config.model_dir.clone(),
            cell: OnceLock::new(),
        }
    }

    pub fn engine(&self) -> Result<&EmbeddingEngine> {
        match self
            .cell
            .get_or_init(|| EmbeddingEngine::load(&self.model_dir).map_err(|e| e.to_string()))
        {
            Ok(engine) => Ok(engine),
            Err(message) => Err(ResumeScorerError::Embedding(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let v = vec![0.5, 0.5, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_similarity_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_missing_model_reports_unavailable_without_retrying() {
        let config = EmbeddingConfig {
            model_dir: PathBuf::from("/nonexistent/model/dir"),
            max_chars: 512,
        };
        let lazy = LazyEmbeddings::new(&config);

        assert!(lazy.engine().is_err());
        // Second call hits the cached failure.
        assert!(lazy.engine().is_err());
    }
}
