//! Deterministic regex/rule-based extraction tier
//!
//! Runs independently per field and never fails: each field is a
//! best-effort extraction, with sentinel/empty values when nothing
//! matches. Patterns live in ordered tables so new variants can be added
//! without touching control flow.

use crate::extractor::name::{clean_name, letter_ratio, title_case};
use crate::extractor::profile::{
    derive_experience, CandidateProfile, ExtractionMethod, UNKNOWN_NAME,
};
use aho_corasick::AhoCorasick;
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::collections::HashSet;

/// Fixed vocabulary of technical skill terms matched whole-word against the
/// resume text.
const SKILL_VOCABULARY: &[&str] = &[
    // languages
    "python", "java", "javascript", "typescript", "c++", "c#", "rust", "go", "kotlin",
    "swift", "php", "ruby", "scala", "html", "css", "sql", "nosql", "bash",
    "shell scripting",
    // frameworks
    "react", "angular", "vue", "node.js", "node", "express", "django", "flask",
    "fastapi", "spring boot",
    // data stores
    "mongodb", "postgresql", "mysql", "redis", "elasticsearch",
    // cloud and devops
    "aws", "azure", "gcp", "docker", "kubernetes", "jenkins", "ci/cd", "terraform",
    "ansible", "prometheus", "grafana", "devops", "serverless", "linux", "windows",
    "git",
    // ml and data
    "machine learning", "deep learning", "nlp", "computer vision", "tensorflow",
    "pytorch", "scikit-learn", "pandas", "numpy", "matplotlib", "seaborn", "tableau",
    "power bi",
    // apis and architecture
    "rest api", "graphql", "websocket", "soap", "microservices",
    // process
    "agile", "scrum", "jira", "confluence", "slack",
];

/// Ordered (pattern, canonical label) table for degree extraction. Each
/// label is collected at most once, in table order.
const EDUCATION_PATTERNS: &[(&str, &str)] = &[
    (r"\b(master\s+of\s+computer\s+application|mca)\b", "MCA"),
    (r"\b(bachelor\s+of\s+computer\s+application|bca)\b", "BCA"),
    (r"\b(m\.?tech|master\s+of\s+technology)\b", "M.Tech"),
    (r"\b(b\.?tech|bachelor\s+of\s+technology)\b", "B.Tech"),
    (r"\b(m\.?sc|master\s+of\s+science)\b", "M.Sc"),
    (r"\b(b\.?sc|bachelor\s+of\s+science)\b", "B.Sc"),
    (r"\b(mba|master\s+of\s+business\s+administration)\b", "MBA"),
    (r"\b(b\.e\.?|bachelor\s+of\s+engineering)\b", "B.E."),
    (r"\b(m\.e\.?|master\s+of\s+engineering)\b", "M.E."),
    (r"\b(ph\.?d\.?|doctorate|doctoral)\b", "Ph.D."),
    (r"\b(b\.a\.?|bachelor\s+of\s+arts)\b", "B.A."),
    (r"\b(m\.a\.?|master\s+of\s+arts)\b", "M.A."),
    (r"\b(b\.?com|bachelor\s+of\s+commerce)\b", "B.Com"),
    (r"\b(m\.?com|master\s+of\s+commerce)\b", "M.Com"),
    (r"\bhsc\b", "HSC"),
    (r"\bssc\b", "SSC"),
    (r"\b(diploma|associate)\b", "Diploma"),
];

/// Ranges longer than this are treated as resume noise, not employment.
const MAX_RANGE_MONTHS: i64 = 240;

pub struct HeuristicExtractor {
    email_patterns: Vec<Regex>,
    phone_patterns: Vec<Regex>,
    linkedin_regex: Regex,
    github_regex: Regex,
    name_separators: Vec<Regex>,
    strip_punct_regex: Regex,
    years_patterns: Vec<Regex>,
    date_range_regex: Regex,
    education_table: Vec<(Regex, &'static str)>,
    skills_matcher: AhoCorasick,
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicExtractor {
    pub fn new() -> Self {
        let email_patterns = vec![
            Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email regex"),
            Regex::new(r"[A-Za-z0-9._%+-]+\s*@\s*[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
                .expect("spaced email regex"),
            Regex::new(r"(?i)[A-Za-z0-9._%+-]+\s*\[\s*at\s*\]\s*[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
                .expect("bracketed email regex"),
        ];

        let phone_patterns = vec![
            Regex::new(r"\+?\d{1,3}[-.\s]?\(?\d{1,4}\)?[-.\s]?\d{1,4}[-.\s]?\d{1,9}")
                .expect("phone regex"),
            Regex::new(r"\(\d{3}\)\s\d{3}-\d{4}").expect("area-code phone regex"),
            Regex::new(r"\d{3}-\d{3}-\d{4}").expect("dashed phone regex"),
            Regex::new(r"\d{10}").expect("bare phone regex"),
        ];

        let name_separators = vec![
            Regex::new(r"\+").expect("separator regex"),
            Regex::new(r"#").expect("separator regex"),
            Regex::new(r"\|").expect("separator regex"),
            Regex::new(r"@").expect("separator regex"),
            Regex::new(r"\d{10}").expect("separator regex"),
            Regex::new(r"(?i)linkedin").expect("separator regex"),
            Regex::new(r"(?i)github").expect("separator regex"),
        ];

        let years_patterns = vec![
            Regex::new(r"(?i)(\d+)\+?\s*(?:years?|yrs?)\s+(?:of\s+)?(?:experience|exp)")
                .expect("years regex"),
            Regex::new(r"(?i)(?:experience|exp)[:\s]+(\d+)\+?\s*(?:years?|yrs?)")
                .expect("experience-prefix regex"),
            Regex::new(r"(?i)total\s+(?:experience|exp)[:\s]+(\d+)").expect("total-exp regex"),
        ];

        let date_range_regex = Regex::new(
            r#"(?i)([a-z]{3,9})\s*['"]?(\d{4})\s*[–—to\-]+\s*([a-z]{3,9}|present|current|now)\s*['"]?(\d{4})?"#,
        )
        .expect("date range regex");

        let education_table = EDUCATION_PATTERNS
            .iter()
            .map(|(pattern, label)| {
                (
                    Regex::new(&format!("(?i){}", pattern)).expect("education regex"),
                    *label,
                )
            })
            .collect();

        let skills_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(aho_corasick::MatchKind::LeftmostLongest)
            .build(SKILL_VOCABULARY)
            .expect("skill matcher");

        Self {
            email_patterns,
            phone_patterns,
            linkedin_regex: Regex::new(r"(?i)linkedin\.com/in/[^\s]+").expect("linkedin regex"),
            github_regex: Regex::new(r"(?i)github\.com/[^\s]+").expect("github regex"),
            name_separators,
            strip_punct_regex: Regex::new(r"[^\w\s]").expect("punctuation regex"),
            years_patterns,
            date_range_regex,
            education_table,
            skills_matcher,
        }
    }

    /// Best-effort extraction of every profile field. Total: always returns
    /// a profile, however sparse.
    pub fn extract(&self, text: &str) -> CandidateProfile {
        self.extract_with_today(text, chrono::Local::now().date_naive())
    }

    fn extract_with_today(&self, text: &str, today: NaiveDate) -> CandidateProfile {
        let (experience_years, experience_months) = self.extract_experience(text, today);

        CandidateProfile {
            name: self.extract_name(text),
            email: self.extract_email(text),
            phone: self.extract_phone(text),
            linkedin_url: self.extract_profile_url(&self.linkedin_regex, text),
            github_url: self.extract_profile_url(&self.github_regex, text),
            skills: self.extract_skills(text),
            experience_years,
            experience_months,
            education: self.extract_education(text),
            // Only the model tier can recover these richer fields.
            certifications: Vec::new(),
            summary: None,
            extraction_method: ExtractionMethod::Heuristic,
        }
    }

    fn extract_email(&self, text: &str) -> Option<String> {
        for pattern in &self.email_patterns {
            if let Some(m) = pattern.find(text) {
                let email = m
                    .as_str()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
                    .replace("[at]", "@");
                return Some(email);
            }
        }
        None
    }

    fn extract_phone(&self, text: &str) -> Option<String> {
        self.phone_patterns
            .iter()
            .find_map(|pattern| pattern.find(text))
            .map(|m| m.as_str().to_string())
    }

    fn extract_profile_url(&self, pattern: &Regex, text: &str) -> Option<String> {
        pattern.find(text).map(|m| {
            let url = m.as_str();
            if url.to_lowercase().starts_with("http") {
                url.to_string()
            } else {
                format!("https://{}", url)
            }
        })
    }

    /// Two-strategy name extraction: text before the earliest contact-info
    /// separator, then a short-line scan near the top of the document.
    fn extract_name(&self, text: &str) -> String {
        if let Some(candidate) = self.name_before_separator(text) {
            return clean_name(&candidate);
        }
        if let Some(candidate) = self.name_from_leading_lines(text) {
            return clean_name(&candidate);
        }
        UNKNOWN_NAME.to_string()
    }

    fn name_before_separator(&self, text: &str) -> Option<String> {
        let cut = self
            .name_separators
            .iter()
            .filter_map(|sep| sep.find(text).map(|m| m.start()))
            .min()
            .unwrap_or(text.len());

        let head = text[..cut].trim();
        let words: Vec<&str> = head.split_whitespace().collect();
        if words.is_empty() || words.len() > 5 {
            return None;
        }

        let candidate = self
            .strip_punct_regex
            .replace_all(&words.join(" "), "")
            .trim()
            .to_string();
        if candidate.len() >= 3 && letter_ratio(&candidate) > 0.8 {
            Some(title_case(&candidate))
        } else {
            None
        }
    }

    fn name_from_leading_lines(&self, text: &str) -> Option<String> {
        const REJECT: [&str; 9] = [
            "email", "phone", "linkedin", "github", "http", ":", "@", "#", "+",
        ];

        text.lines()
            .take(5)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .find(|line| {
                (3..=50).contains(&line.len())
                    && (1..=5).contains(&line.split_whitespace().count())
                    && !REJECT.iter().any(|kw| line.to_lowercase().contains(kw))
                    && letter_ratio(line) > 0.7
            })
            .map(title_case)
    }

    /// Explicit "N years of experience" statements win; otherwise employment
    /// date ranges are summed.
    fn extract_experience(&self, text: &str, today: NaiveDate) -> (f64, u32) {
        for pattern in &self.years_patterns {
            let max_years = pattern
                .captures_iter(text)
                .filter_map(|cap| cap[1].parse::<u32>().ok())
                .max();
            if let Some(years) = max_years {
                return derive_experience(years as f64, 0);
            }
        }

        let months = self.sum_date_ranges(text, today);
        if months > 0 {
            derive_experience(0.0, months)
        } else {
            (0.0, 0)
        }
    }

    fn sum_date_ranges(&self, text: &str, today: NaiveDate) -> u32 {
        let mut total: i64 = 0;

        for cap in self.date_range_regex.captures_iter(text) {
            let Some(start_month) = month_number(&cap[1]) else {
                continue;
            };
            let Ok(start_year) = cap[2].parse::<i32>() else {
                continue;
            };

            let end_token = cap[3].to_lowercase();
            let (end_year, end_month) = if matches!(&end_token[..3.min(end_token.len())], "pre" | "cur" | "now") {
                (today.year(), today.month())
            } else {
                let Some(month) = month_number(&end_token) else {
                    continue;
                };
                let year = cap
                    .get(4)
                    .and_then(|g| g.as_str().parse::<i32>().ok())
                    .unwrap_or(start_year);
                (year, month)
            };

            let delta =
                i64::from(end_year - start_year) * 12 + i64::from(end_month) - i64::from(start_month);
            if delta > 0 && delta < MAX_RANGE_MONTHS {
                total += delta;
            }
        }

        total.clamp(0, u32::MAX as i64) as u32
    }

    fn extract_education(&self, text: &str) -> Vec<String> {
        self.education_table
            .iter()
            .filter(|(pattern, _)| pattern.is_match(text))
            .map(|(_, label)| label.to_string())
            .collect()
    }

    fn extract_skills(&self, text: &str) -> Vec<String> {
        self.match_vocabulary(text)
            .into_iter()
            .map(title_case)
            .collect()
    }

    /// Whole-word vocabulary hits in canonical (lowercase) form, deduplicated
    /// in first-match order. Shared with job-description parsing.
    pub(crate) fn match_vocabulary(&self, text: &str) -> Vec<&'static str> {
        let bytes = text.as_bytes();
        let mut seen = HashSet::new();
        let mut skills = Vec::new();

        for m in self.skills_matcher.find_iter(text) {
            // Whole-word only: the match must not continue an alphanumeric run.
            let before_ok = m.start() == 0 || !bytes[m.start() - 1].is_ascii_alphanumeric();
            let after_ok = m.end() == bytes.len() || !bytes[m.end()].is_ascii_alphanumeric();
            if !(before_ok && after_ok) {
                continue;
            }

            let canonical = SKILL_VOCABULARY[m.pattern().as_usize()];
            if seen.insert(canonical) {
                skills.push(canonical);
            }
        }

        skills
    }
}

fn month_number(token: &str) -> Option<u32> {
    let prefix: String = token.to_lowercase().chars().take(3).collect();
    match prefix.as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> HeuristicExtractor {
        HeuristicExtractor::new()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 3, 15).unwrap()
    }

    #[test]
    fn test_email_standard() {
        let profile = extractor().extract("john smith john.smith@example.com developer");
        assert_eq!(profile.email.as_deref(), Some("john.smith@example.com"));
    }

    #[test]
    fn test_email_with_spaces_and_at_token() {
        let profile = extractor().extract("reach me: jane.doe [at] corp.io for details");
        assert_eq!(profile.email.as_deref(), Some("jane.doe@corp.io"));

        let profile = extractor().extract("contact jane @ corp.io anytime");
        assert_eq!(profile.email.as_deref(), Some("jane@corp.io"));
    }

    #[test]
    fn test_phone_first_match() {
        let profile = extractor().extract("anita rao +91-98765-43210 bangalore");
        assert_eq!(profile.phone.as_deref(), Some("+91-98765-43210"));
    }

    #[test]
    fn test_profile_urls_get_scheme() {
        let profile =
            extractor().extract("see linkedin.com/in/jdoe and github.com/jdoe for code");
        assert_eq!(
            profile.linkedin_url.as_deref(),
            Some("https://linkedin.com/in/jdoe")
        );
        assert_eq!(profile.github_url.as_deref(), Some("https://github.com/jdoe"));
    }

    #[test]
    fn test_name_before_separator() {
        let profile = extractor().extract("john smith + 1234567890 | delhi");
        assert_eq!(profile.name, "John Smith");
    }

    #[test]
    fn test_name_sentinel_for_contact_only_header() {
        let profile = extractor().extract("+1-555-0101 john@x.com");
        assert_eq!(profile.name, UNKNOWN_NAME);
    }

    #[test]
    fn test_name_from_leading_lines() {
        let text = "resume\nPriya Sharma\nbackend engineer contact below\nmore text";
        let profile = extractor().extract(text);
        assert_eq!(profile.name, "Resume");

        // Lines with digits or contact keywords are skipped; the first
        // short, wordy line wins.
        let text = "12 345 678 90 11 22\nemail: contact below\nPriya Sharma\nskills: python";
        assert_eq!(extractor().extract(text).name, "Priya Sharma");
    }

    #[test]
    fn test_explicit_years_take_maximum() {
        let extractor = extractor();
        let (years, months) = extractor.extract_experience(
            "3 years of experience in java, 5+ years of experience overall",
            today(),
        );
        assert_eq!(years, 5.0);
        assert_eq!(months, 60);
    }

    #[test]
    fn test_experience_from_date_ranges() {
        let extractor = extractor();
        let text = "acme corp jan 2020 - jan 2022, globex mar 2022 to present";
        let (years, months) = extractor.extract_experience(text, today());
        assert_eq!(months, 36);
        assert_eq!(years, 3.0);
    }

    #[test]
    fn test_date_range_cap_ignores_noise() {
        let extractor = extractor();
        // A 30-year range reads like a birth date, not employment.
        let (years, months) = extractor.extract_experience("jan 1990 - jan 2020", today());
        assert_eq!(months, 0);
        assert_eq!(years, 0.0);
    }

    #[test]
    fn test_no_experience_found() {
        let (years, months) = extractor().extract_experience("fresh graduate", today());
        assert_eq!((years, months), (0.0, 0));
    }

    #[test]
    fn test_education_table_order_and_dedup() {
        let profile = extractor().extract("b.tech in cs, then mca, then another b.tech course");
        assert_eq!(profile.education, vec!["MCA", "B.Tech"]);
    }

    #[test]
    fn test_education_requires_dotted_two_letter_degrees() {
        let profile = extractor().extract("i want to be a great engineer");
        assert!(profile.education.is_empty());

        let profile = extractor().extract("b.e. in mechanical engineering");
        assert_eq!(profile.education, vec!["B.E."]);
    }

    #[test]
    fn test_skills_whole_word_only() {
        let profile = extractor().extract("python, django and postgresql; going strong");
        assert!(profile.skills.contains(&"Python".to_string()));
        assert!(profile.skills.contains(&"Django".to_string()));
        assert!(profile.skills.contains(&"Postgresql".to_string()));
        // "going" must not match the skill "go"
        assert!(!profile.skills.contains(&"Go".to_string()));
    }

    #[test]
    fn test_skills_prefer_longest_match() {
        let profile = extractor().extract("built services in node.js and javascript");
        assert!(profile.skills.contains(&"Node.js".to_string()));
        assert!(profile.skills.contains(&"Javascript".to_string()));
        assert!(!profile.skills.contains(&"Java".to_string()));
    }

    #[test]
    fn test_extractor_is_total() {
        let profile = extractor().extract("");
        assert_eq!(profile.name, UNKNOWN_NAME);
        assert!(profile.skills.is_empty());
        assert_eq!(profile.extraction_method, ExtractionMethod::Heuristic);

        let profile = extractor().extract("@@@ ### 12345 +++");
        assert_eq!(profile.name, UNKNOWN_NAME);
    }

    #[test]
    fn test_certifications_and_summary_stay_empty() {
        let profile = extractor().extract("aws certified solutions architect, summary: builder");
        assert!(profile.certifications.is_empty());
        assert!(profile.summary.is_none());
    }
}
