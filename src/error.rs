//! Error handling for the resume scoring engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeScorerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Invalid document container: {0}")]
    InvalidContainer(String),

    #[error("Normalized text too short: {got} characters, minimum is {minimum}")]
    TextTooShort { got: usize, minimum: usize },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ResumeScorerError>;

impl From<anyhow::Error> for ResumeScorerError {
    fn from(err: anyhow::Error) -> Self {
        ResumeScorerError::ExtractionFailed(err.to_string())
    }
}
