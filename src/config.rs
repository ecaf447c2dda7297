//! Configuration management for the resume scoring engine

use crate::error::{Result, ResumeScorerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model_tier: ModelTierConfig,
    pub embedding: EmbeddingConfig,
    pub reader: ReaderConfig,
    pub text: TextConfig,
    pub scoring: ScoringConfig,
}

/// Settings for the external model-tier extraction backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelTierConfig {
    /// Chat-completions style endpoint URL.
    pub endpoint: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Name of the environment variable holding the API credential.
    /// Resolved once at startup; when unset the model tier is disabled
    /// and extraction goes straight to the heuristic tier.
    pub api_key_env: String,
    /// Resume text is truncated to this many characters before submission.
    pub max_input_chars: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Directory containing the Model2Vec embedding model.
    pub model_dir: PathBuf,
    /// Each side of a similarity measurement is truncated to this length.
    pub max_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// PDF text shorter than this triggers the OCR fallback.
    pub ocr_trigger_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Normalized text below this length fails extraction.
    pub min_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub skill_weight: f64,
    pub experience_weight: f64,
    pub education_weight: f64,
    pub semantic_weight: f64,
}

impl Default for ModelTierConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "RESUME_SCORER_API_KEY".to_string(),
            max_input_chars: 4000,
            timeout_secs: 60,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models/m2v-base"),
            max_chars: 512,
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            ocr_trigger_chars: 100,
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self { min_length: 50 }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            skill_weight: 0.35,
            experience_weight: 0.25,
            education_weight: 0.10,
            semantic_weight: 0.30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_tier: ModelTierConfig::default(),
            embedding: EmbeddingConfig::default(),
            reader: ReaderConfig::default(),
            text: TextConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, or defaults when `path` is None.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content).map_err(|e| {
                    ResumeScorerError::Configuration(format!(
                        "failed to parse {}: {}",
                        path.display(),
                        e
                    ))
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Resolve the model-tier API credential from the environment.
    pub fn model_tier_api_key(&self) -> Option<String> {
        std::env::var(&self.model_tier.api_key_env)
            .ok()
            .filter(|v| !v.trim().is_empty())
    }
}
