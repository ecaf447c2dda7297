//! Structured candidate facts extracted from a resume

use serde::{Deserialize, Serialize};

/// Sentinel used when no plausible candidate name can be recovered.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Which tier produced the profile. Downstream consumers use this to
/// assess extraction confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Model,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    /// Case-normalized display form, deduplicated; order carries no meaning.
    pub skills: Vec<String>,
    pub experience_years: f64,
    pub experience_months: u32,
    /// Canonical degree labels, deduplicated, first-seen order.
    pub education: Vec<String>,
    pub certifications: Vec<String>,
    pub summary: Option<String>,
    pub extraction_method: ExtractionMethod,
}

impl CandidateProfile {
    pub fn empty(extraction_method: ExtractionMethod) -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            email: None,
            phone: None,
            linkedin_url: None,
            github_url: None,
            skills: Vec::new(),
            experience_years: 0.0,
            experience_months: 0,
            education: Vec::new(),
            certifications: Vec::new(),
            summary: None,
            extraction_method,
        }
    }
}

/// Canonical experience derivation: whichever of years/months is missing is
/// computed from the other, with years always rounded to 2 decimals.
pub fn derive_experience(years: f64, months: u32) -> (f64, u32) {
    let years = if years.is_finite() { years.max(0.0) } else { 0.0 };

    if months == 0 && years > 0.0 {
        let months = (years * 12.0).round() as u32;
        (round2(years), months)
    } else if years == 0.0 && months > 0 {
        (round2(months as f64 / 12.0), months)
    } else {
        (round2(years), months)
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_months_derived_from_years() {
        assert_eq!(derive_experience(1.5, 0), (1.5, 18));
        assert_eq!(derive_experience(3.0, 0), (3.0, 36));
    }

    #[test]
    fn test_years_derived_from_months() {
        assert_eq!(derive_experience(0.0, 18), (1.5, 18));
        assert_eq!(derive_experience(0.0, 7), (0.58, 7));
    }

    #[test]
    fn test_both_present_left_alone() {
        assert_eq!(derive_experience(2.0, 30), (2.0, 30));
    }

    #[test]
    fn test_negative_and_nonfinite_years_zeroed() {
        assert_eq!(derive_experience(-1.0, 0), (0.0, 0));
        assert_eq!(derive_experience(f64::NAN, 6), (0.5, 6));
    }

    #[test]
    fn test_extraction_method_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ExtractionMethod::Model).unwrap(),
            "\"model\""
        );
        assert_eq!(
            serde_json::to_string(&ExtractionMethod::Heuristic).unwrap(),
            "\"heuristic\""
        );
    }
}
