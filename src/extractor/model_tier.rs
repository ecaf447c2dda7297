//! Model-based extraction tier
//!
//! Sends a bounded prefix of the resume text to an external
//! chat-completions endpoint with a strict JSON contract, and parses the
//! response into a [`CandidateProfile`]. Every failure mode here (missing
//! credential, transport error, bad status, markdown-wrapped or malformed
//! JSON, schema mismatch) is a single tier-failure signal: the caller falls
//! back to the heuristic tier instead of surfacing an error.

use crate::config::ModelTierConfig;
use crate::extractor::name::clean_name;
use crate::extractor::profile::{derive_experience, CandidateProfile, ExtractionMethod};
use crate::text::truncate_chars;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const RESUME_EXTRACTION_PROMPT: &str = r#"You are an expert ATS (Applicant Tracking System) parser.
Extract structured data from the following Resume text.

Return ONLY a valid JSON object. Do not add any markdown formatting (like ```json).

Fields to extract:
- name: ONLY the person's full name (first, middle, last). Do NOT include address, phone, symbols like +, #, or any other text.
- email: Email address (string)
- phone: Phone number (string)
- linkedin_url: LinkedIn profile URL (string or empty)
- github_url: GitHub profile URL (string or empty)
- skills: List of technical and professional skills (list of strings)
- experience_years: Total years of experience as a float number (e.g. 0.5 for 6 months)
- experience_months: Total months of experience as an integer (e.g. 6, 18, 24)
- education: List of EXACT degree names found in the resume (e.g. ["MCA", "B.Tech"]). Only include actual degrees mentioned.
- certifications: List of certifications (list of strings)
- summary: Brief professional summary if present (string or empty)

Resume Text:
{resume_text}

Output JSON:
"#;

/// Internal failure modes of the model tier. Never propagated outside the
/// extractor; any variant means "fall back to the heuristic tier".
#[derive(Error, Debug)]
pub enum ModelTierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response contained no content")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// The JSON object the model is contracted to return. Tolerant of the
/// field-name drift models exhibit (`linkedin` vs `linkedin_url`), strict
/// about types: a type mismatch is a schema violation and fails the tier.
#[derive(Debug, Default, Deserialize)]
struct RawModelProfile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default, alias = "linkedin")]
    linkedin_url: Option<String>,
    #[serde(default, alias = "github")]
    github_url: Option<String>,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default)]
    experience_years: f64,
    #[serde(default)]
    experience_months: f64,
    #[serde(default)]
    education: Vec<String>,
    #[serde(default)]
    certifications: Vec<String>,
    #[serde(default)]
    summary: Option<String>,
}

/// Fields the model is contracted to return for a job description.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawJdFields {
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub required_experience_years: f64,
    #[serde(default)]
    pub education_required: Option<String>,
}

pub(crate) fn parse_jd_fields(content: &str) -> Result<RawJdFields, ModelTierError> {
    Ok(serde_json::from_str(strip_code_fences(content))?)
}

/// Client for the external model backend. Constructed once per process;
/// `from_config` returns None when the API credential is absent so callers
/// skip the tier without attempting a doomed call per request.
pub struct ModelClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    max_input_chars: usize,
}

impl ModelClient {
    pub fn from_config(config: &ModelTierConfig, api_key: Option<String>) -> Option<Self> {
        let api_key = api_key?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .ok()?;

        Some(Self {
            http,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            max_input_chars: config.max_input_chars,
        })
    }

    /// One extraction attempt. No retry: a failure here immediately routes
    /// the caller to the heuristic tier.
    pub async fn extract(&self, resume_text: &str) -> Result<CandidateProfile, ModelTierError> {
        let truncated = truncate_chars(resume_text, self.max_input_chars);
        let prompt = RESUME_EXTRACTION_PROMPT.replace("{resume_text}", truncated);

        let content = self.complete(&prompt).await?;
        parse_model_profile(&content)
    }

    pub(crate) fn truncate_input<'a>(&self, text: &'a str) -> &'a str {
        truncate_chars(text, self.max_input_chars)
    }

    pub(crate) async fn complete(&self, prompt: &str) -> Result<String, ModelTierError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.0,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ModelTierError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ModelTierError::EmptyResponse)?;

        debug!("model tier returned {} chars", content.len());
        Ok(content)
    }
}

/// Parse the model's JSON payload into a finalized profile.
pub(crate) fn parse_model_profile(content: &str) -> Result<CandidateProfile, ModelTierError> {
    let stripped = strip_code_fences(content);
    let raw: RawModelProfile = serde_json::from_str(stripped)?;

    let (experience_years, experience_months) =
        derive_experience(raw.experience_years, raw.experience_months.max(0.0).round() as u32);

    Ok(CandidateProfile {
        name: clean_name(raw.name.as_deref().unwrap_or_default()),
        email: non_empty(raw.email),
        phone: non_empty(raw.phone),
        linkedin_url: non_empty(raw.linkedin_url),
        github_url: non_empty(raw.github_url),
        skills: raw.skills,
        experience_years,
        experience_months,
        education: raw.education,
        certifications: raw.certifications,
        summary: non_empty(raw.summary),
        extraction_method: ExtractionMethod::Model,
    })
}

/// Models regularly ignore the "no markdown" instruction; strip a wrapping
/// code fence before parsing.
fn strip_code_fences(content: &str) -> &str {
    let mut text = content.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
