//! Integration tests for the ATS resume scorer

use resume_ats::config::Config;
use resume_ats::output::formatter::ReportGenerator;
use resume_ats::processing::resume::EducationLevel;
use resume_ats::{AnalysisResult, AtsError, ComparisonReport, InputManager, OutputFormat, ResumeAnalyzer, ScoringMode};
use std::path::{Path, PathBuf};

const REFERENCE_YEAR: i32 = 2025;

fn fixture(name: &str) -> PathBuf {
    Path::new("tests/fixtures").join(name)
}

fn config_with_custom_profiles() -> Config {
    let mut config = Config::default();
    config.scoring.reference_year = Some(REFERENCE_YEAR);
    config.profiles.custom_file = Some(fixture("profiles.toml"));
    config
}

#[tokio::test]
async fn test_load_json_resume() {
    let mut manager = InputManager::new().unwrap();
    let resume = manager.load_resume(&fixture("sample_resume.json")).await.unwrap();

    assert_eq!(resume.contact_info.email.as_deref(), Some("alex.morgan@example.com"));
    assert_eq!(resume.experience_years, 7);
    assert_eq!(resume.education_level, EducationLevel::Bachelors);
    assert_eq!(resume.skills.len(), 9);
    assert!(resume.has_section("experience"));
    assert!(resume.has_section("projects"));
}

#[tokio::test]
async fn test_parse_text_resume() {
    let mut manager = InputManager::new().unwrap();
    let resume = manager.load_resume(&fixture("sample_resume.txt")).await.unwrap();

    assert!(resume.contact_info.email.is_some());
    assert!(resume.skills.contains(&"react".to_string()));
    assert!(resume.skills.contains(&"node.js".to_string()));
    assert_eq!(resume.experience_years, 7);
    assert_eq!(resume.education_level, EducationLevel::Bachelors);
    for section in ["summary", "experience", "education", "skills"] {
        assert!(resume.has_section(section), "missing section {}", section);
    }
}

#[tokio::test]
async fn test_markdown_resume_is_flattened() {
    let mut manager = InputManager::new().unwrap();
    let path = fixture("sample_resume.md");

    let text = manager.extract_text(&path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Node.js"));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));

    let resume = manager.load_resume(&path).await.unwrap();
    assert!(resume.has_section("skills"));
    assert!(resume.has_section("experience"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new().unwrap();
    let path = fixture("sample_resume.txt");

    let text1 = manager.extract_text(&path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(&path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_and_missing_files() {
    let mut manager = InputManager::new().unwrap();

    let result = manager.load_resume(&fixture("unsupported.xyz")).await;
    assert!(matches!(result, Err(AtsError::UnsupportedFormat(_))));

    let result = manager.load_resume(&fixture("missing.txt")).await;
    assert!(matches!(result, Err(AtsError::InvalidInput(_))));

    let result = manager.load_job_description(&fixture("sample_resume.json")).await;
    assert!(matches!(result, Err(AtsError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_analyze_with_job_description() {
    let mut manager = InputManager::new().unwrap();
    let resume = manager.load_resume(&fixture("sample_resume.json")).await.unwrap();
    let job = manager.load_job_description(&fixture("job.txt")).await.unwrap();

    let analyzer = ResumeAnalyzer::new(REFERENCE_YEAR).unwrap();
    let result = analyzer.analyze(&resume, "google", Some(&job), "smart").unwrap();

    assert_eq!(result.company, "Google");
    assert_eq!(result.mode, ScoringMode::Smart);
    assert!(result.advisories.is_empty());
    assert!((0.0..=100.0).contains(&result.overall_score));
    assert!(result.ats_results.passes_initial_screening);

    let gaps = &result.keyword_gaps;
    assert!(gaps.jd_skill_match_percentage.is_some());
    assert!(gaps.matched_jd_skills.contains(&"python".to_string()));
    assert!(gaps.missing_jd_skills.contains(&"terraform".to_string()));
    assert!(gaps.missing_jd_skills.contains(&"kafka".to_string()));
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.title == "Add missing job description skills"));
}

#[tokio::test]
async fn test_unknown_company_and_mode_fall_back() {
    let mut manager = InputManager::new().unwrap();
    let resume = manager.load_resume(&fixture("sample_resume.txt")).await.unwrap();

    let analyzer = ResumeAnalyzer::new(REFERENCE_YEAR).unwrap();
    let result = analyzer.analyze(&resume, "Pied Piper", None, "vibes").unwrap();

    assert_eq!(result.company, "Generic");
    assert_eq!(result.mode, ScoringMode::Rule);
    assert_eq!(result.advisories.len(), 2);
    assert_eq!(result.keyword_gaps.jd_skill_match_percentage, None);
}

#[tokio::test]
async fn test_compare_all_isolates_bad_profiles() {
    let mut manager = InputManager::new().unwrap();
    let resume = manager.load_resume(&fixture("sample_resume.json")).await.unwrap();

    let config = config_with_custom_profiles();
    let analyzer = ResumeAnalyzer::from_config(&config).unwrap();
    let report = analyzer.compare_all(&resume, None, "rule");

    assert!(report.results.contains_key("Hooli"));
    assert!(report.results.contains_key("Google"));
    assert!(report.results.contains_key("Generic"));
    assert!(!report.results.contains_key("Broken Corp"));
    assert!(report.failures["Broken Corp"].contains("weights"));
    assert_eq!(report.results.len() + report.failures.len(), analyzer.store().len());

    let ranked = report.ranked();
    assert!(ranked.windows(2).all(|w| w[0].overall_score >= w[1].overall_score));
    assert_eq!(report.best().map(|r| &r.company), ranked.first().map(|r| &r.company));

    // a bad profile fails on its own as well
    assert!(matches!(
        analyzer.analyze(&resume, "broken corp", None, "rule"),
        Err(AtsError::InvalidProfile { .. })
    ));
}

#[tokio::test]
async fn test_results_are_deterministic_and_round_trip() {
    let mut manager = InputManager::new().unwrap();
    let resume = manager.load_resume(&fixture("sample_resume.json")).await.unwrap();
    let job = manager.load_job_description(&fixture("job.txt")).await.unwrap();

    let analyzer = ResumeAnalyzer::new(REFERENCE_YEAR).unwrap();
    let first = analyzer.analyze(&resume, "Amazon", Some(&job), "rule").unwrap();
    let second = analyzer.analyze(&resume, "Amazon", Some(&job), "rule").unwrap();
    assert_eq!(first, second);

    let generator = ReportGenerator::with_options(false, true, false);
    let json = generator.generate_analysis(&first, OutputFormat::Json).unwrap();
    let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, first);

    let report = analyzer.compare_all(&resume, Some(&job), "smart");
    let json = generator.generate_comparison(&report, OutputFormat::Json).unwrap();
    let parsed: ComparisonReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn test_invalid_json_resume_names_field() {
    let result = resume_ats::ResumeRecord::from_json_str(r#"{"skills": ["rust", 7]}"#);
    match result {
        Err(AtsError::InvalidResume { field, .. }) => assert_eq!(field, "skills[1]"),
        other => panic!("expected invalid resume error, got {:?}", other),
    }
}
