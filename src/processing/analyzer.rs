//! Main analysis pipeline combining ATS scoring, gap analysis, section assessment and recommendations

use crate::config::Config;
use crate::error::{AtsError, Result};
use crate::processing::engine::{round2, AtsResult, ScoringEngine, ScoringMode};
use crate::processing::gap::{GapAnalyzer, KeywordGaps};
use crate::processing::profiles::{CompanyProfile, ProfileStore, GENERIC_COMPANY};
use crate::processing::recommendations::{Recommendation, RecommendationSynthesizer};
use crate::processing::resume::ResumeRecord;
use crate::processing::sections::{SectionAssessor, SectionReport, SectionStrength};
use crate::processing::vocabulary::SkillVocabulary;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Blend of the ATS score against the section average
const ATS_SHARE: f64 = 0.7;
const SECTION_SHARE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub experience_years: u32,
    pub skill_count: usize,
    pub section_count: usize,
    pub word_count: usize,
}

impl ResumeSummary {
    fn from_resume(resume: &ResumeRecord) -> Self {
        Self {
            experience_years: resume.experience_years,
            skill_count: resume.skills.len(),
            section_count: resume.present_section_count(),
            word_count: resume.word_count(),
        }
    }
}

/// Result of analyzing one resume against one company profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Identifier of the profile actually used
    pub company: String,
    pub mode: ScoringMode,
    pub overall_score: f64,
    pub ats_results: AtsResult,
    pub section_analysis: BTreeMap<String, SectionReport>,
    pub keyword_gaps: KeywordGaps,
    pub recommendations: Vec<Recommendation>,
    pub resume_summary: ResumeSummary,
    /// Non-fatal notices such as an unknown company or mode being replaced by a default
    #[serde(default)]
    pub advisories: Vec<String>,
}

/// Results of scoring one resume against every known company
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub mode: ScoringMode,
    pub results: BTreeMap<String, AnalysisResult>,
    /// company -> error message for companies that could not be scored
    pub failures: BTreeMap<String, String>,
    #[serde(default)]
    pub advisories: Vec<String>,
}

impl ComparisonReport {
    /// Companies ordered by overall score, best first; ties broken by name
    pub fn ranked(&self) -> Vec<&AnalysisResult> {
        let mut ranked: Vec<&AnalysisResult> = self.results.values().collect();
        ranked.sort_by(|a, b| {
            b.overall_score
                .total_cmp(&a.overall_score)
                .then_with(|| a.company.cmp(&b.company))
        });
        ranked
    }

    pub fn best(&self) -> Option<&AnalysisResult> {
        self.ranked().into_iter().next()
    }
}

/// Blend the ATS score with the average strength of the present sections.
pub fn combine_overall_score(ats_score: f64, sections: &BTreeMap<String, SectionReport>) -> f64 {
    let present: Vec<f64> = sections
        .values()
        .filter(|s| s.present)
        .map(|s| s.strength.points())
        .collect();

    let section_score = if present.is_empty() {
        SectionStrength::Poor.points()
    } else {
        present.iter().sum::<f64>() / present.len() as f64
    };

    round2((ATS_SHARE * ats_score + SECTION_SHARE * section_score).min(100.0))
}

pub struct ResumeAnalyzer {
    store: Arc<ProfileStore>,
    engine: ScoringEngine,
    gap_analyzer: GapAnalyzer,
    section_assessor: SectionAssessor,
    synthesizer: RecommendationSynthesizer,
}

impl ResumeAnalyzer {
    /// Analyzer over the built-in profiles with default settings
    pub fn new(reference_year: i32) -> Result<Self> {
        Ok(Self {
            store: Arc::new(ProfileStore::builtin()),
            engine: ScoringEngine::new(reference_year),
            gap_analyzer: GapAnalyzer::new()?,
            section_assessor: SectionAssessor::default(),
            synthesizer: RecommendationSynthesizer::new(),
        })
    }

    /// Create an analyzer with the given configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = Arc::new(config.profile_store()?);
        let vocabulary = config.gap.filter_to_vocabulary.then(SkillVocabulary::default);

        info!(
            "Loaded {} company profiles, reference year {}",
            store.len(),
            config.reference_year()
        );

        Ok(Self {
            store,
            engine: ScoringEngine::new(config.reference_year()).with_notes(config.scoring.include_notes),
            gap_analyzer: GapAnalyzer::with_vocabulary(vocabulary)?,
            section_assessor: SectionAssessor::new(config.gap.suggestion_limit),
            synthesizer: RecommendationSynthesizer::new(),
        })
    }

    /// Replace the profile store; the store itself is shared, never mutated
    pub fn with_store(mut self, store: Arc<ProfileStore>) -> Self {
        self.store = store;
        self
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Analyze a resume for one company. Unknown companies use the Generic profile
    /// and unknown modes use rule mode; both are reported as advisories.
    pub fn analyze(
        &self,
        resume: &ResumeRecord,
        company: &str,
        job_description: Option<&str>,
        mode: &str,
    ) -> Result<AnalysisResult> {
        let mut advisories = Vec::new();
        let mode = normalize_mode(mode, &mut advisories);
        let profile = self.resolve_profile(company, &mut advisories);

        let mut result = self.analyze_profile(resume, profile, job_description, mode)?;
        result.advisories = advisories;
        Ok(result)
    }

    /// Analyze with an already parsed mode
    pub fn analyze_with_mode(
        &self,
        resume: &ResumeRecord,
        company: &str,
        job_description: Option<&str>,
        mode: ScoringMode,
    ) -> Result<AnalysisResult> {
        let mut advisories = Vec::new();
        let profile = self.resolve_profile(company, &mut advisories);

        let mut result = self.analyze_profile(resume, profile, job_description, mode)?;
        result.advisories = advisories;
        Ok(result)
    }

    /// Run the single-company analysis for every listed company.
    ///
    /// A company that fails to score is recorded in `failures` and skipped.
    pub fn compare_all(&self, resume: &ResumeRecord, job_description: Option<&str>, mode: &str) -> ComparisonReport {
        let mut advisories = Vec::new();
        let mode = normalize_mode(mode, &mut advisories);
        let mut report = ComparisonReport {
            mode,
            advisories,
            ..ComparisonReport::default()
        };

        for profile in self.store.profiles() {
            match self.analyze_profile(resume, profile, job_description, mode) {
                Ok(result) => {
                    report.results.insert(profile.company.clone(), result);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", profile.company, e);
                    report.failures.insert(profile.company.clone(), e.to_string());
                }
            }
        }

        info!(
            "Compared against {} companies ({} failed)",
            report.results.len(),
            report.failures.len()
        );
        report
    }

    fn resolve_profile(&self, company: &str, advisories: &mut Vec<String>) -> &CompanyProfile {
        match self.store.lookup(company) {
            Some(profile) => profile,
            None => {
                warn!("Unknown company '{}', using {} profile", company, GENERIC_COMPANY);
                advisories.push(format!(
                    "Unknown company '{}'; the {} profile was used",
                    company, GENERIC_COMPANY
                ));
                self.store.generic()
            }
        }
    }

    fn analyze_profile(
        &self,
        resume: &ResumeRecord,
        profile: &CompanyProfile,
        job_description: Option<&str>,
        mode: ScoringMode,
    ) -> Result<AnalysisResult> {
        debug!("Analyzing resume for {} in {} mode", profile.company, mode);

        let ats_results = self.engine.score(resume, profile, mode)?;
        let section_analysis = self.section_assessor.assess(resume, profile);
        let keyword_gaps = self.gap_analyzer.analyze(resume, profile, job_description);
        let recommendations =
            self.synthesizer
                .synthesize(resume, profile, &ats_results, &keyword_gaps, &section_analysis);
        let overall_score = combine_overall_score(ats_results.overall_ats_score, &section_analysis);

        if !overall_score.is_finite() {
            return Err(AtsError::AnalysisFailed(format!(
                "non-finite overall score for {}",
                profile.company
            )));
        }

        Ok(AnalysisResult {
            company: profile.company.clone(),
            mode,
            overall_score,
            ats_results,
            section_analysis,
            keyword_gaps,
            recommendations,
            resume_summary: ResumeSummary::from_resume(resume),
            advisories: Vec::new(),
        })
    }
}

fn normalize_mode(mode: &str, advisories: &mut Vec<String>) -> ScoringMode {
    match mode.parse::<ScoringMode>() {
        Ok(mode) => mode,
        Err(_) => {
            warn!("Unknown scoring mode '{}', using rule mode", mode);
            advisories.push(format!("Unknown scoring mode '{}'; rule mode was used", mode));
            ScoringMode::Rule
        }
    }
}
