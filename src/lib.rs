//! Resume extraction and scoring engine
//!
//! Turns raw PDF/DOCX bytes into a structured candidate profile and
//! computes an explainable match score against a job's requirements:
//! Document Reader -> Text Normalizer -> Field Extractor -> Scoring Engine.

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod extractor;
pub mod pipeline;
pub mod reader;
pub mod scoring;
pub mod text;

pub use config::Config;
pub use error::{Result, ResumeScorerError};
pub use pipeline::{Evaluation, Pipeline};
