//! ATS scoring engine: rule-based and smart (heuristic) sub-scores

use crate::error::{AtsError, Result};
use crate::processing::notes::company_notes;
use crate::processing::profiles::CompanyProfile;
use crate::processing::resume::ResumeRecord;
use crate::processing::text_processor::TextProcessor;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Sections every resume is expected to have
pub const REQUIRED_SECTIONS: [&str; 3] = ["experience", "education", "skills"];

/// Sections that earn the smart-mode completeness bonus
pub const COMPLETE_SECTIONS: [&str; 4] = ["experience", "education", "skills", "summary"];

const LEADERSHIP_TERMS: [&str; 5] = ["lead", "manage", "director", "senior", "principal"];

const SYNONYM_CREDIT: f64 = 0.8;
const STUFFING_DENSITY: f64 = 0.10;
const STUFFING_FACTOR: f64 = 0.9;

const RECENCY_BONUS: f64 = 5.0;
const RECENCY_WINDOW_YEARS: i32 = 2;
const LEADERSHIP_BONUS: f64 = 10.0;

const EDUCATION_STEP: f64 = 15.0;
const EDUCATION_NEUTRAL: f64 = 50.0;
const ELITE_EDUCATION_FLOOR: f64 = 85.0;
const ELITE_EDUCATION_BONUS: f64 = 10.0;

const SKILL_SUBSTRING_CREDIT: f64 = 0.5;
const SKILL_TEXT_CREDIT: f64 = 0.3;
const SKILL_BONUS_CAP: f64 = 20.0;

const MISSING_SECTION_PENALTY: f64 = 20.0;
const MISSING_EMAIL_PENALTY: f64 = 30.0;
const COMPLETE_SECTIONS_BONUS: f64 = 10.0;
const SHORT_RESUME_WORDS: usize = 200;
const SHORT_RESUME_PENALTY: f64 = 15.0;

const CATEGORY_BONUS: f64 = 5.0;
const RULE_STRICTNESS_FACTOR: f64 = 0.2;
const SMART_STRICTNESS_FACTOR: f64 = 0.15;

const MIN_SCREENING_TEXT_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// Deterministic literal matching
    #[default]
    Rule,
    /// Synonyms, density penalties and bonus adjustments
    Smart,
}

impl ScoringMode {
    /// Parse a mode, degrading unknown values to [`ScoringMode::Rule`].
    pub fn normalize(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!("Unknown scoring mode '{}', using rule mode", value);
            ScoringMode::Rule
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMode::Rule => "rule",
            ScoringMode::Smart => "smart",
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringMode {
    type Err = AtsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "rule" | "rule-based" | "rules" => Ok(ScoringMode::Rule),
            "smart" => Ok(ScoringMode::Smart),
            other => Err(AtsError::InvalidInput(format!(
                "Invalid scoring mode: {}. Supported: rule, smart",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsResult {
    pub mode: ScoringMode,
    pub passes_initial_screening: bool,
    pub keyword_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub skills_score: f64,
    pub format_score: f64,
    /// Profile-weighted sum of the five sub-scores
    pub weighted_score: f64,
    /// Smart-mode category bonus added before the strictness penalty
    pub category_bonus: f64,
    pub overall_ats_score: f64,
    pub ats_recommendation: String,
    pub company_specific_notes: Vec<String>,
}

/// Resume fields prepared once per scoring call
struct ScoringInput<'a> {
    resume: &'a ResumeRecord,
    text: String,
    words: Vec<String>,
    word_count: usize,
    keywords: HashSet<String>,
    skills: Vec<String>,
}

impl<'a> ScoringInput<'a> {
    fn new(resume: &'a ResumeRecord, text_processor: &TextProcessor) -> Self {
        Self {
            resume,
            text: resume.raw_text.to_lowercase(),
            words: text_processor.words(&resume.raw_text),
            word_count: resume.word_count(),
            keywords: resume.keywords.iter().map(|k| k.trim().to_lowercase()).collect(),
            skills: resume.skills.iter().map(|s| s.trim().to_lowercase()).collect(),
        }
    }

    /// Literal substring of the text, or a precomputed keyword
    fn mentions(&self, keyword: &str) -> bool {
        !keyword.is_empty() && (self.text.contains(keyword) || self.keywords.contains(keyword))
    }
}

/// Scores resumes against company profiles
pub struct ScoringEngine {
    reference_year: i32,
    include_notes: bool,
    text_processor: TextProcessor,
}

impl ScoringEngine {
    /// `reference_year` anchors the recency bonus so scoring never reads the clock.
    pub fn new(reference_year: i32) -> Self {
        Self {
            reference_year,
            include_notes: true,
            text_processor: TextProcessor::new(),
        }
    }

    pub fn with_notes(mut self, include_notes: bool) -> Self {
        self.include_notes = include_notes;
        self
    }

    /// Score with a free-form mode string; unknown modes fall back to rule mode.
    pub fn score_with_mode(&self, resume: &ResumeRecord, profile: &CompanyProfile, mode: &str) -> Result<AtsResult> {
        self.score(resume, profile, ScoringMode::normalize(mode))
    }

    /// Compute the ATS result for one resume and profile.
    pub fn score(&self, resume: &ResumeRecord, profile: &CompanyProfile, mode: ScoringMode) -> Result<AtsResult> {
        profile.validate()?;
        let input = ScoringInput::new(resume, &self.text_processor);

        let (keyword, experience, education, skills, format) = match mode {
            ScoringMode::Rule => (
                self.keyword_score_rule(&input, profile),
                self.experience_score_rule(&input, profile),
                self.education_score_rule(&input, profile),
                self.skills_score_rule(&input, profile),
                self.format_score_rule(&input),
            ),
            ScoringMode::Smart => (
                self.keyword_score_smart(&input, profile),
                self.experience_score_smart(&input, profile),
                self.education_score_smart(&input, profile),
                self.skills_score_smart(&input, profile),
                self.format_score_smart(&input),
            ),
        };

        let w = &profile.weights;
        let weighted = keyword * w.keyword
            + experience * w.experience
            + education * w.education
            + skills * w.skills
            + format * w.format;

        let (category_bonus, adjusted) = match mode {
            ScoringMode::Rule => (0.0, weighted * (1.0 - profile.scoring_strictness * RULE_STRICTNESS_FACTOR)),
            ScoringMode::Smart => {
                let bonus = self.category_bonus(&input, profile);
                (
                    bonus,
                    (weighted + bonus) * (1.0 - profile.scoring_strictness * SMART_STRICTNESS_FACTOR),
                )
            }
        };
        let overall = round2(clamp_score(adjusted));

        debug!(
            "{} ({}) keyword={:.2} experience={:.2} education={:.2} skills={:.2} format={:.2} overall={:.2}",
            profile.company, mode, keyword, experience, education, skills, format, overall
        );

        let company_specific_notes = if self.include_notes {
            company_notes(profile)
        } else {
            Vec::new()
        };

        Ok(AtsResult {
            mode,
            passes_initial_screening: initial_screening(resume),
            keyword_score: round2(keyword),
            experience_score: round2(experience),
            education_score: round2(education),
            skills_score: round2(skills),
            format_score: round2(format),
            weighted_score: round2(weighted),
            category_bonus,
            overall_ats_score: overall,
            ats_recommendation: ats_recommendation(overall).to_string(),
            company_specific_notes,
        })
    }

    fn keyword_score_rule(&self, input: &ScoringInput, profile: &CompanyProfile) -> f64 {
        let total = profile.preferred_keywords.len();
        let matched = profile
            .preferred_keywords
            .iter()
            .filter(|k| input.mentions(&k.to_lowercase()))
            .count();
        percentage(matched as f64, total)
    }

    fn keyword_score_smart(&self, input: &ScoringInput, profile: &CompanyProfile) -> f64 {
        let total = profile.preferred_keywords.len();
        let mut credit = 0.0;

        for keyword in &profile.preferred_keywords {
            let keyword = keyword.to_lowercase();
            if input.mentions(&keyword) {
                credit += 1.0;
            } else if profile
                .synonyms_for(&keyword)
                .iter()
                .any(|synonym| input.mentions(&synonym.to_lowercase()))
            {
                credit += SYNONYM_CREDIT;
            }
        }

        if keyword_density(input, profile, &self.text_processor) > STUFFING_DENSITY {
            debug!("Keyword stuffing detected for {}", profile.company);
            credit *= STUFFING_FACTOR;
        }

        percentage(credit, total).max(0.0)
    }

    fn experience_score_rule(&self, input: &ScoringInput, profile: &CompanyProfile) -> f64 {
        let years = input.resume.experience_years;

        if years >= profile.experience_threshold("senior") {
            100.0
        } else if years >= profile.experience_threshold("mid") {
            80.0
        } else if years >= profile.experience_threshold("entry") {
            60.0
        } else {
            40.0
        }
    }

    fn experience_score_smart(&self, input: &ScoringInput, profile: &CompanyProfile) -> f64 {
        let mut score = self.experience_score_rule(input, profile);

        if self.mentions_recent_year(&input.text) {
            score += RECENCY_BONUS;
        }
        if LEADERSHIP_TERMS.iter().any(|term| input.text.contains(term)) {
            score += LEADERSHIP_BONUS;
        }

        score.min(100.0)
    }

    /// A year token within the last few years of the reference year
    fn mentions_recent_year(&self, text: &str) -> bool {
        let earliest = self.reference_year - RECENCY_WINDOW_YEARS;
        self.text_processor
            .years(text)
            .into_iter()
            .any(|year| (earliest..=self.reference_year).contains(&year))
    }

    fn education_score_rule(&self, input: &ScoringInput, profile: &CompanyProfile) -> f64 {
        match profile
            .education_preferences
            .iter()
            .position(|level| *level == input.resume.education_level)
        {
            Some(index) => (100.0 - EDUCATION_STEP * index as f64).max(0.0),
            None => EDUCATION_NEUTRAL,
        }
    }

    fn education_score_smart(&self, input: &ScoringInput, profile: &CompanyProfile) -> f64 {
        let base = self.education_score_rule(input, profile);
        if profile.category.is_elite() && base >= ELITE_EDUCATION_FLOOR {
            (base + ELITE_EDUCATION_BONUS).min(100.0)
        } else {
            base
        }
    }

    fn skills_score_rule(&self, input: &ScoringInput, profile: &CompanyProfile) -> f64 {
        let total = profile.required_skills.len();
        let matched = profile
            .required_skills
            .iter()
            .filter(|skill| has_exact_skill(input, &skill.to_lowercase()))
            .count();
        percentage(matched as f64, total)
    }

    fn skills_score_smart(&self, input: &ScoringInput, profile: &CompanyProfile) -> f64 {
        let total = profile.required_skills.len();
        if total == 0 {
            return 0.0;
        }

        let base = self.skills_score_rule(input, profile);
        let partial: f64 = profile
            .required_skills
            .iter()
            .map(|skill| skill.to_lowercase())
            .filter(|skill| !has_exact_skill(input, skill))
            .map(|skill| {
                if input.skills.iter().any(|s| s.contains(skill.as_str())) {
                    SKILL_SUBSTRING_CREDIT
                } else if input.text.contains(skill.as_str()) {
                    SKILL_TEXT_CREDIT
                } else {
                    0.0
                }
            })
            .sum();

        // partial credit counts like matched skills, capped at the bonus ceiling
        let bonus = percentage(partial, total).min(SKILL_BONUS_CAP);
        (base + bonus).min(100.0)
    }

    fn format_score_rule(&self, input: &ScoringInput) -> f64 {
        let mut score = 100.0;

        for section in REQUIRED_SECTIONS {
            if !input.resume.has_section(section) {
                score -= MISSING_SECTION_PENALTY;
            }
        }
        if !input.resume.contact_info.has_email() {
            score -= MISSING_EMAIL_PENALTY;
        }

        f64::max(score, 0.0)
    }

    fn format_score_smart(&self, input: &ScoringInput) -> f64 {
        let mut score = self.format_score_rule(input);

        if COMPLETE_SECTIONS.iter().all(|s| input.resume.has_section(s)) {
            score += COMPLETE_SECTIONS_BONUS;
        }
        if input.word_count < SHORT_RESUME_WORDS {
            score -= SHORT_RESUME_PENALTY;
        }

        clamp_score(score)
    }

    fn category_bonus(&self, input: &ScoringInput, profile: &CompanyProfile) -> f64 {
        if profile
            .category
            .bonus_terms()
            .iter()
            .any(|term| input.text.contains(term))
        {
            CATEGORY_BONUS
        } else {
            0.0
        }
    }
}

/// Advisory gate: contact email, enough text and at least one skill.
pub fn initial_screening(resume: &ResumeRecord) -> bool {
    resume.contact_info.has_email()
        && resume.raw_text.chars().count() > MIN_SCREENING_TEXT_LEN
        && !resume.skills.is_empty()
}

/// Qualitative verdict for an ATS score
pub fn ats_recommendation(score: f64) -> &'static str {
    if score >= 80.0 {
        "High likelihood of passing ATS screening"
    } else if score >= 60.0 {
        "Moderate likelihood of passing ATS screening"
    } else if score >= 40.0 {
        "Low likelihood of passing ATS screening"
    } else {
        "Very low likelihood of passing ATS screening"
    }
}

/// Whole-word preferred-keyword occurrences per word of resume text
fn keyword_density(input: &ScoringInput, profile: &CompanyProfile, text_processor: &TextProcessor) -> f64 {
    if input.word_count == 0 {
        return 0.0;
    }
    let occurrences: usize = profile
        .preferred_keywords
        .iter()
        .map(|k| text_processor.phrase_occurrences(k, &input.words))
        .sum();
    occurrences as f64 / input.word_count as f64
}

fn has_exact_skill(input: &ScoringInput, skill: &str) -> bool {
    input.skills.iter().any(|s| s == skill)
}

/// `part / total` as a percentage; an empty denominator yields 0
pub fn percentage(part: f64, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part / total as f64 * 100.0
    }
}

pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Round to the two-decimal reporting precision
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
