//! Multi-factor weighted scoring with an explainable breakdown
//!
//! Final score = 0.35·skill + 0.25·experience + 0.10·education +
//! 0.30·semantic, every component clamped to [0, 100]. Missing or
//! malformed optional data degrades scores; it never raises.

pub mod semantic;

use crate::config::ScoringConfig;
use crate::extractor::CandidateProfile;
use semantic::SemanticScorer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Score used when a component has nothing to measure against.
const NEUTRAL_SCORE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedSkill {
    pub name: String,
    #[serde(default = "default_skill_weight")]
    pub weight: f64,
}

fn default_skill_weight() -> f64 {
    1.0
}

/// A job's hiring criteria as supplied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobRequirement {
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub weighted_skills: Option<Vec<WeightedSkill>>,
    /// 0 means no experience requirement.
    #[serde(default)]
    pub experience_required_years: f64,
    /// Absent, "Any" and "None" all mean no education requirement.
    #[serde(default)]
    pub education_required: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl JobRequirement {
    /// Uniform weighted view over whichever skill list is present. Plain
    /// skill names get weight 1.0 and are lowercased.
    fn unified_skills(&self) -> Vec<WeightedSkill> {
        match &self.weighted_skills {
            Some(weighted) if !weighted.is_empty() => weighted.clone(),
            _ => self
                .required_skills
                .iter()
                .map(|name| WeightedSkill {
                    name: name.to_lowercase(),
                    weight: 1.0,
                })
                .collect(),
        }
    }

    pub(crate) fn skill_names(&self) -> Vec<String> {
        self.unified_skills().into_iter().map(|s| s.name).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringResult {
    pub skill_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub semantic_score: f64,
    pub final_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// Percentage of the weighted skill mass satisfied.
    pub skill_coverage: f64,
    /// Weighted contribution per component; the four values sum to
    /// `final_score`.
    pub breakdown: BTreeMap<String, f64>,
}

struct SkillScore {
    score: f64,
    matched: Vec<String>,
    missing: Vec<String>,
    coverage: f64,
}

pub struct ScoringEngine {
    weights: ScoringConfig,
    semantic: SemanticScorer,
}

impl ScoringEngine {
    pub fn new(weights: ScoringConfig, semantic: SemanticScorer) -> Self {
        Self { weights, semantic }
    }

    /// Score a candidate profile against a job requirement. Produces a
    /// fresh result per call and never fails.
    pub fn score(
        &self,
        profile: &CandidateProfile,
        resume_text: &str,
        requirement: &JobRequirement,
    ) -> ScoringResult {
        let skills = self.score_skills(profile, resume_text, requirement);

        let skill_score = clamp(skills.score);
        let experience_score = clamp(score_experience(
            profile.experience_years,
            requirement.experience_required_years,
        ));
        let education_score = clamp(score_education(
            &profile.education,
            requirement.education_required.as_deref(),
        ));
        let semantic_score = clamp(self.semantic.score(profile, resume_text, requirement));

        let mut breakdown = BTreeMap::new();
        breakdown.insert(
            "skill_component".to_string(),
            skill_score * self.weights.skill_weight,
        );
        breakdown.insert(
            "experience_component".to_string(),
            experience_score * self.weights.experience_weight,
        );
        breakdown.insert(
            "education_component".to_string(),
            education_score * self.weights.education_weight,
        );
        breakdown.insert(
            "semantic_component".to_string(),
            semantic_score * self.weights.semantic_weight,
        );

        let final_score = clamp(breakdown.values().sum());

        ScoringResult {
            skill_score,
            experience_score,
            education_score,
            semantic_score,
            final_score,
            matched_skills: skills.matched,
            missing_skills: skills.missing,
            skill_coverage: skills.coverage,
            breakdown,
        }
    }

    fn score_skills(
        &self,
        profile: &CandidateProfile,
        resume_text: &str,
        requirement: &JobRequirement,
    ) -> SkillScore {
        let weighted = requirement.unified_skills();
        let total_weight: f64 = weighted.iter().map(|s| s.weight).sum();

        if total_weight <= 0.0 {
            return SkillScore {
                score: NEUTRAL_SCORE,
                matched: Vec::new(),
                missing: Vec::new(),
                coverage: 0.0,
            };
        }

        let candidate_skills: Vec<String> =
            profile.skills.iter().map(|s| s.to_lowercase()).collect();
        let text = resume_text.to_lowercase();

        let mut matched = Vec::new();
        let mut missing = Vec::new();
        let mut matched_weight = 0.0;

        for skill in &weighted {
            let name = skill.name.to_lowercase();
            // The substring check against the full resume text is a known
            // heuristic limitation: short names ("go", "r") can match
            // inside unrelated words.
            let found = candidate_skills.contains(&name) || text.contains(&name);
            if found {
                matched.push(skill.name.clone());
                matched_weight += skill.weight;
            } else {
                missing.push(skill.name.clone());
            }
        }

        let coverage = matched_weight / total_weight * 100.0;

        SkillScore {
            score: coverage,
            matched,
            missing,
            coverage,
        }
    }
}

/// Experience ladder: no requirement is neutral-or-full, an unmet
/// requirement scales linearly, meeting it is full marks.
fn score_experience(candidate_years: f64, required_years: f64) -> f64 {
    if required_years <= 0.0 {
        if candidate_years <= 0.0 {
            return NEUTRAL_SCORE;
        }
        return 100.0;
    }

    if candidate_years <= 0.0 {
        return 0.0;
    }

    if candidate_years >= required_years {
        100.0
    } else {
        candidate_years / required_years * 100.0
    }
}

fn score_education(candidate_education: &[String], required: Option<&str>) -> f64 {
    let requirement = required
        .map(str::trim)
        .filter(|r| !r.is_empty() && !matches!(r.to_lowercase().as_str(), "any" | "none"));

    let Some(required) = requirement else {
        return if candidate_education.is_empty() {
            30.0
        } else {
            70.0
        };
    };

    if candidate_education.is_empty() {
        return 0.0;
    }

    let required = required.to_lowercase();
    let mut best: f64 = 0.0;

    for degree in candidate_education {
        let degree = degree.to_lowercase();
        if required.contains("phd") && degree.contains("phd") {
            best = 100.0;
        } else if required.contains("master")
            && (degree.contains("master") || degree.contains("msc"))
        {
            best = best.max(90.0);
        } else if required.contains("bachelor")
            && (degree.contains("bachelor") || degree.contains("bsc") || degree.contains("bs"))
        {
            best = best.max(80.0);
        } else if required.contains(&degree) || degree.contains(&required) {
            best = best.max(70.0);
        }
    }

    // Partial credit for holding some degree, even an unrelated one.
    if best > 0.0 {
        best
    } else {
        30.0
    }
}

fn clamp(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}
