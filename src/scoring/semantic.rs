//! Section-based semantic similarity scoring

use crate::embedding::{cosine_similarity, EmbeddingEngine, LazyEmbeddings};
use crate::extractor::CandidateProfile;
use crate::scoring::JobRequirement;
use crate::text::truncate_chars;
use log::warn;
use std::sync::Arc;

/// Returned when no similarity measurement was computable: uncertainty,
/// not failure.
const NEUTRAL_SCORE: f64 = 50.0;

/// Computes up to three independent text-similarity measurements and
/// averages whichever were computable:
///
/// 1. candidate skill list vs required skill list
/// 2. experience-section window vs job description
/// 3. projects-section window (when detectable) vs job description
pub struct SemanticScorer {
    embeddings: Arc<LazyEmbeddings>,
    max_chars: usize,
}

impl SemanticScorer {
    pub fn new(embeddings: Arc<LazyEmbeddings>, max_chars: usize) -> Self {
        Self {
            embeddings,
            max_chars,
        }
    }

    /// Score in [0, 100]. An unavailable embedding backend degrades the
    /// whole component to neutral; a degenerate single measurement counts
    /// as zero similarity without touching its siblings.
    pub fn score(
        &self,
        profile: &CandidateProfile,
        resume_text: &str,
        requirement: &JobRequirement,
    ) -> f64 {
        let engine = match self.embeddings.engine() {
            Ok(engine) => engine,
            Err(e) => {
                warn!("embedding backend unavailable, semantic score is neutral: {}", e);
                return NEUTRAL_SCORE;
            }
        };

        let mut similarities: Vec<f64> = Vec::new();

        let candidate_skills = profile.skills.join(" ");
        let job_skills = requirement.skill_names().join(" ");
        if !candidate_skills.is_empty() && !job_skills.is_empty() {
            similarities.push(self.measure(engine, &candidate_skills, &job_skills));
        }

        if !requirement.description.is_empty() {
            let window = experience_window(resume_text);
            if !window.trim().is_empty() {
                similarities.push(self.measure(engine, window, &requirement.description));
            }

            if let Some(window) = projects_window(resume_text) {
                similarities.push(self.measure(engine, window, &requirement.description));
            }
        }

        if similarities.is_empty() {
            NEUTRAL_SCORE
        } else {
            similarities.iter().sum::<f64>() / similarities.len() as f64 * 100.0
        }
    }

    fn measure(&self, engine: &EmbeddingEngine, left: &str, right: &str) -> f64 {
        let left = truncate_chars(left, self.max_chars);
        let right = truncate_chars(right, self.max_chars);
        if left.is_empty() || right.is_empty() {
            return 0.0;
        }
        f64::from(cosine_similarity(&engine.encode(left), &engine.encode(right)))
    }
}

/// The stretch of text from the "experience" heading up to a following
/// "education" heading, or to the end of the text when none follows. With
/// no "experience" heading at all, the document head stands in.
fn experience_window(text: &str) -> &str {
    match text.find("experience") {
        Some(start) => {
            let end = text[start..]
                .find("education")
                .map(|offset| start + offset)
                .unwrap_or(text.len());
            &text[start..end]
        }
        None => truncate_chars(text, 500),
    }
}

fn projects_window(text: &str) -> Option<&str> {
    text.find("projects")
        .map(|start| truncate_chars(&text[start..], 1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmbeddingConfig;
    use crate::extractor::{CandidateProfile, ExtractionMethod};
    use std::path::PathBuf;

    fn scorer_without_backend() -> SemanticScorer {
        let config = EmbeddingConfig {
            model_dir: PathBuf::from("/nonexistent/model/dir"),
            max_chars: 512,
        };
        SemanticScorer::new(Arc::new(LazyEmbeddings::new(&config)), config.max_chars)
    }

    #[test]
    fn test_unavailable_backend_is_neutral() {
        let profile = CandidateProfile::empty(ExtractionMethod::Heuristic);
        let requirement = JobRequirement {
            description: "build backend services".to_string(),
            ..JobRequirement::default()
        };
        let score = scorer_without_backend().score(&profile, "experience at acme", &requirement);
        assert_eq!(score, 50.0);
    }

    #[test]
    fn test_experience_window_bounded_by_education() {
        let text = "summary here experience built services at acme education b.tech";
        let window = experience_window(text);
        assert!(window.starts_with("experience"));
        assert!(window.contains("acme"));
        assert!(!window.contains("b.tech"));
    }

    #[test]
    fn test_experience_window_extends_to_end() {
        let text = "intro experience shipped many systems";
        assert_eq!(experience_window(text), "experience shipped many systems");
    }

    #[test]
    fn test_experience_window_falls_back_to_head() {
        let text = "a resume with no section headings at all";
        assert_eq!(experience_window(text), text);
    }

    #[test]
    fn test_projects_window_detection() {
        assert!(projects_window("no such section").is_none());
        let window = projects_window("skills x projects built a compiler").unwrap();
        assert!(window.starts_with("projects"));
    }
}
