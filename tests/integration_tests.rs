//! Integration tests for the full extraction and scoring pipeline
//!
//! Documents are built in memory as minimal DOCX archives so the tests
//! need no fixtures, no network and no external OCR toolchain.

use resume_scorer::config::Config;
use resume_scorer::error::ResumeScorerError;
use resume_scorer::extractor::ExtractionMethod;
use resume_scorer::reader::RawDocument;
use resume_scorer::scoring::{JobRequirement, WeightedSkill};
use resume_scorer::Pipeline;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

/// Pipeline with the model tier hermetically disabled: the credential env
/// var is one that is never set, so extraction always uses the heuristic
/// tier and no HTTP call is ever attempted.
fn offline_pipeline() -> Pipeline {
    let mut config = Config::default();
    config.model_tier.api_key_env = "RESUME_SCORER_TEST_NO_KEY".to_string();
    Pipeline::new(&config)
}

fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let document_xml = format!(
        r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{}</w:body>
</w:document>"#,
        body
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.start_file("[Content_Types].xml", options).unwrap();
    writer
        .write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .unwrap();
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(document_xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

fn sample_resume() -> Vec<u8> {
    build_docx(&[
        "Priya Sharma | Bangalore",
        "Email: priya.sharma@example.com | +91 9876543210",
        "linkedin.com/in/priyasharma github.com/priyasharma",
        "Skills: Python, Django, PostgreSQL, Docker",
        "Experience",
        "Software Engineer at Acme Corp, Jan 2020 - Jan 2022",
        "Backend Developer at Globex, Feb 2022 - present",
        "Projects: built a job queue in Rust",
        "Education: B.Tech in Computer Science, 2019",
    ])
}

#[tokio::test]
async fn test_ingest_normalizes_and_preserves_contacts() {
    let pipeline = offline_pipeline();
    let document = RawDocument::new(sample_resume(), "resume.docx");

    let text = pipeline.ingest(document).await.unwrap();

    assert!(text.as_str().contains("priya sharma"));
    assert!(text.as_str().contains("priya.sharma@example.com"));
    assert!(!text.as_str().contains('\n'));
    assert!(text.as_str().chars().all(|c| !c.is_uppercase()));
}

#[tokio::test]
async fn test_extract_heuristic_profile_from_docx() {
    let pipeline = offline_pipeline();
    let document = RawDocument::new(sample_resume(), "resume.docx");

    let text = pipeline.ingest(document).await.unwrap();
    let profile = pipeline.extract(&text).await.into_profile();

    assert_eq!(profile.extraction_method, ExtractionMethod::Heuristic);
    assert_eq!(profile.name, "Priya Sharma");
    assert_eq!(profile.email.as_deref(), Some("priya.sharma@example.com"));
    assert!(profile.phone.is_some());
    assert_eq!(
        profile.linkedin_url.as_deref(),
        Some("https://linkedin.com/in/priyasharma")
    );
    assert_eq!(
        profile.github_url.as_deref(),
        Some("https://github.com/priyasharma")
    );
    assert!(profile.skills.contains(&"Python".to_string()));
    assert!(profile.skills.contains(&"Docker".to_string()));
    assert!(profile.skills.contains(&"Rust".to_string()));
    assert_eq!(profile.education, vec!["B.Tech"]);
    // Two employment ranges, the second still open.
    assert!(profile.experience_months >= 24);
    assert!(profile.experience_years >= 2.0);
    assert!(profile.certifications.is_empty());
}

#[tokio::test]
async fn test_evaluate_end_to_end() {
    let pipeline = offline_pipeline();
    let document = RawDocument::new(sample_resume(), "resume.docx");
    let requirement = JobRequirement {
        weighted_skills: Some(vec![
            WeightedSkill {
                name: "python".to_string(),
                weight: 10.0,
            },
            WeightedSkill {
                name: "docker".to_string(),
                weight: 5.0,
            },
            WeightedSkill {
                name: "kafka".to_string(),
                weight: 5.0,
            },
        ]),
        experience_required_years: 2.0,
        education_required: Some("B.Tech".to_string()),
        description: "Backend engineer building Python services".to_string(),
        ..JobRequirement::default()
    };

    let evaluation = pipeline.evaluate(document, &requirement).await.unwrap();
    let result = &evaluation.result;

    assert_eq!(result.matched_skills, vec!["python", "docker"]);
    assert_eq!(result.missing_skills, vec!["kafka"]);
    assert!((result.skill_coverage - 75.0).abs() < 1e-6);
    assert_eq!(result.experience_score, 100.0);
    // No embedding model on disk: semantic component is neutral.
    assert_eq!(result.semantic_score, 50.0);

    for score in [
        result.skill_score,
        result.experience_score,
        result.education_score,
        result.semantic_score,
        result.final_score,
    ] {
        assert!((0.0..=100.0).contains(&score));
    }
    let sum: f64 = result.breakdown.values().sum();
    assert!((sum - result.final_score).abs() < 1e-6);
}

#[tokio::test]
async fn test_unsupported_format_is_rejected() {
    let pipeline = offline_pipeline();
    let document = RawDocument::new(b"plain text resume".to_vec(), "resume.txt");

    let err = pipeline.ingest(document).await.unwrap_err();
    assert!(matches!(err, ResumeScorerError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn test_corrupt_docx_is_rejected() {
    let pipeline = offline_pipeline();
    let document = RawDocument::new(b"definitely not a zip archive".to_vec(), "resume.docx");

    let err = pipeline.ingest(document).await.unwrap_err();
    assert!(matches!(err, ResumeScorerError::InvalidContainer(_)));
}

#[tokio::test]
async fn test_short_document_fails_normalization() {
    let pipeline = offline_pipeline();
    let document = RawDocument::new(build_docx(&["Hi"]), "resume.docx");

    let err = pipeline.ingest(document).await.unwrap_err();
    assert!(matches!(err, ResumeScorerError::TextTooShort { .. }));
}

#[tokio::test]
async fn test_media_type_fallback_dispatch() {
    let pipeline = offline_pipeline();
    let document = RawDocument::new(sample_resume(), "upload")
        .with_media_type("application/vnd.openxmlformats-officedocument.wordprocessingml.document");

    let text = pipeline.ingest(document).await.unwrap();
    assert!(text.as_str().contains("priya sharma"));
}

#[tokio::test]
async fn test_requirement_parsed_from_free_text() {
    let pipeline = offline_pipeline();
    let requirement = pipeline
        .parse_requirement(
            "Senior backend role. 4+ years experience with Python and Docker. \
             Bachelor's degree required.",
        )
        .await;

    assert_eq!(requirement.experience_required_years, 4.0);
    assert_eq!(requirement.education_required.as_deref(), Some("Bachelor's"));
    assert!(requirement.required_skills.contains(&"python".to_string()));
    assert!(requirement.required_skills.contains(&"docker".to_string()));
}
