//! Job-description parsing into a structured requirement
//!
//! Same two-tier shape as resume extraction: a model-tier call with a
//! strict JSON contract, and a deterministic fallback that never fails.

use crate::extractor::heuristic::HeuristicExtractor;
use crate::extractor::model_tier::{parse_jd_fields, ModelClient, ModelTierError};
use crate::scoring::JobRequirement;
use log::warn;
use regex::Regex;
use std::sync::Arc;

const JD_EXTRACTION_PROMPT: &str = r#"You are an expert ATS (Applicant Tracking System) parser.
Extract structured data from the following Job Description (JD).

Return ONLY a valid JSON object. Do not add any markdown formatting (like ```json).

Fields to extract:
- required_skills: List of technical and soft skills explicitly required (list of strings)
- required_experience_years: Number of years required (default to 0 if not mentioned)
- education_required: Minimum education level (e.g., "Bachelor's", "Master's", "PhD", "Any")

Job Description:
{jd_text}

Output JSON:
"#;

pub struct JobRequirementExtractor {
    model: Option<Arc<ModelClient>>,
    heuristic: Arc<HeuristicExtractor>,
    years_regex: Regex,
}

impl JobRequirementExtractor {
    pub fn new(model: Option<Arc<ModelClient>>, heuristic: Arc<HeuristicExtractor>) -> Self {
        Self {
            model,
            heuristic,
            years_regex: Regex::new(r"(?i)(\d+)(?:\+|\s*-\s*\d+)?\s*(?:years?|yrs?)")
                .expect("years regex"),
        }
    }

    /// Parse free job-description text. Total: the heuristic tier always
    /// produces a requirement.
    pub async fn extract(&self, jd_text: &str) -> JobRequirement {
        if let Some(client) = &self.model {
            match self.extract_with_model(client, jd_text).await {
                Ok(requirement) => return requirement,
                Err(e) => warn!("model tier JD extraction failed, using fallback: {}", e),
            }
        }
        self.heuristic_requirement(jd_text)
    }

    async fn extract_with_model(
        &self,
        client: &ModelClient,
        jd_text: &str,
    ) -> Result<JobRequirement, ModelTierError> {
        let prompt = JD_EXTRACTION_PROMPT.replace("{jd_text}", client.truncate_input(jd_text));
        let content = client.complete(&prompt).await?;
        let fields = parse_jd_fields(&content)?;

        Ok(JobRequirement {
            required_skills: fields.required_skills,
            weighted_skills: None,
            experience_required_years: fields.required_experience_years.max(0.0),
            education_required: fields.education_required,
            description: jd_text.to_string(),
        })
    }

    fn heuristic_requirement(&self, jd_text: &str) -> JobRequirement {
        let lowered = jd_text.to_lowercase();

        let years = self
            .years_regex
            .captures_iter(jd_text)
            .filter_map(|cap| cap[1].parse::<u32>().ok())
            .max()
            .unwrap_or(0);

        let education = if lowered.contains("phd") || lowered.contains("doctorate") {
            Some("PhD".to_string())
        } else if lowered.contains("master") || lowered.contains("m.sc") || lowered.contains("mba")
        {
            Some("Master's".to_string())
        } else if lowered.contains("bachelor")
            || lowered.contains("b.sc")
            || lowered.contains("b.tech")
            || lowered.contains("degree")
        {
            Some("Bachelor's".to_string())
        } else {
            Some("Any".to_string())
        };

        let required_skills = self
            .heuristic
            .match_vocabulary(&lowered)
            .into_iter()
            .map(str::to_string)
            .collect();

        JobRequirement {
            required_skills,
            weighted_skills: None,
            experience_required_years: f64::from(years),
            education_required: education,
            description: jd_text.to_string(),
        }
    }
}
