//! Section strength assessment and section-specific suggestions

use crate::processing::profiles::CompanyProfile;
use crate::processing::resume::ResumeRecord;
use crate::processing::text_processor::TextProcessor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sections every resume is assessed for, present or not
pub const CRITICAL_SECTIONS: [&str; 3] = ["experience", "education", "skills"];

/// Default number of missing keywords suggested for the skills section
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Words that signal achievements or leadership in an experience section
const ACTION_TERMS: &[&str] = &[
    "achieved", "built", "created", "delivered", "designed", "developed", "drove", "improved",
    "increased", "launched", "led", "managed", "mentored", "optimized", "reduced", "scaled",
    "shipped", "spearheaded", "lead", "manage", "director", "senior", "principal",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionStrength {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SectionStrength {
    /// Points used by the overall score combiner
    pub fn points(self) -> f64 {
        match self {
            SectionStrength::Excellent => 100.0,
            SectionStrength::Good => 80.0,
            SectionStrength::Fair => 60.0,
            SectionStrength::Poor => 40.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionStrength::Excellent => "Excellent",
            SectionStrength::Good => "Good",
            SectionStrength::Fair => "Fair",
            SectionStrength::Poor => "Poor",
        }
    }

    pub fn is_weak(self) -> bool {
        self <= SectionStrength::Fair
    }
}

impl fmt::Display for SectionStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionReport {
    pub present: bool,
    pub strength: SectionStrength,
    pub word_count: usize,
    pub suggestions: Vec<String>,
}

impl SectionReport {
    fn absent(name: &str) -> Self {
        Self {
            present: false,
            strength: SectionStrength::Poor,
            word_count: 0,
            suggestions: vec![format!("Add {} {} section", article(name), title_case(name))],
        }
    }
}

pub struct SectionAssessor {
    suggestion_limit: usize,
    text_processor: TextProcessor,
}

impl Default for SectionAssessor {
    fn default() -> Self {
        Self::new(DEFAULT_SUGGESTION_LIMIT)
    }
}

impl SectionAssessor {
    pub fn new(suggestion_limit: usize) -> Self {
        Self {
            suggestion_limit,
            text_processor: TextProcessor::new(),
        }
    }

    /// Critical sections for a profile; selective employers also expect a summary
    pub fn critical_sections(profile: &CompanyProfile) -> Vec<&'static str> {
        let mut sections = CRITICAL_SECTIONS.to_vec();
        if profile.category.is_selective() {
            sections.push("summary");
        }
        sections
    }

    /// Rate every section of the resume, adding absent entries for missing critical sections.
    pub fn assess(&self, resume: &ResumeRecord, profile: &CompanyProfile) -> BTreeMap<String, SectionReport> {
        let mut reports = BTreeMap::new();

        for (name, record) in &resume.sections {
            let report = if record.present {
                let strength = self.strength(name, &record.text, record.word_count, profile);
                SectionReport {
                    present: true,
                    strength,
                    word_count: record.word_count,
                    suggestions: self.suggestions(name, &record.text, record.word_count, strength, profile),
                }
            } else {
                SectionReport::absent(name)
            };
            reports.insert(name.clone(), report);
        }

        for name in Self::critical_sections(profile) {
            reports
                .entry(name.to_string())
                .or_insert_with(|| SectionReport::absent(name));
        }

        reports
    }

    fn strength(&self, name: &str, text: &str, word_count: usize, profile: &CompanyProfile) -> SectionStrength {
        match name {
            "experience" => {
                let signal = self.action_signal(text);
                if word_count >= 150 && signal >= 3 {
                    SectionStrength::Excellent
                } else if word_count >= 80 && signal >= 1 {
                    SectionStrength::Good
                } else if word_count >= 30 {
                    SectionStrength::Fair
                } else {
                    SectionStrength::Poor
                }
            }
            "skills" => {
                let tokens = self.skill_tokens(text, word_count);
                let threshold = profile.category.skills_threshold();
                if tokens >= threshold {
                    SectionStrength::Excellent
                } else if tokens >= threshold / 2 {
                    SectionStrength::Good
                } else if tokens >= 2 {
                    SectionStrength::Fair
                } else {
                    SectionStrength::Poor
                }
            }
            "summary" => match word_count {
                40..=120 => SectionStrength::Excellent,
                25..=160 => SectionStrength::Good,
                n if n >= 10 => SectionStrength::Fair,
                _ => SectionStrength::Poor,
            },
            _ => {
                if word_count > 100 {
                    SectionStrength::Excellent
                } else if word_count > 50 {
                    SectionStrength::Good
                } else if word_count > 20 {
                    SectionStrength::Fair
                } else {
                    SectionStrength::Poor
                }
            }
        }
    }

    /// Occurrences of achievement and leadership words
    fn action_signal(&self, text: &str) -> usize {
        self.text_processor
            .words(text)
            .iter()
            .filter(|w| ACTION_TERMS.contains(&w.as_str()))
            .count()
    }

    /// Tokens longer than two characters; falls back to the declared count when no text was kept
    fn skill_tokens(&self, text: &str, word_count: usize) -> usize {
        if text.trim().is_empty() {
            return word_count;
        }
        self.text_processor
            .words(text)
            .iter()
            .filter(|w| w.chars().count() > 2)
            .count()
    }

    fn suggestions(
        &self,
        name: &str,
        text: &str,
        word_count: usize,
        strength: SectionStrength,
        profile: &CompanyProfile,
    ) -> Vec<String> {
        let mut suggestions = Vec::new();

        match name {
            "experience" => {
                if strength.is_weak() {
                    suggestions.push("Expand each role with responsibilities and results".to_string());
                    suggestions.push("Start bullet points with action verbs such as led, built or improved".to_string());
                } else if strength == SectionStrength::Good {
                    suggestions.push("Quantify more achievements with concrete numbers".to_string());
                }
            }
            "skills" => {
                if strength.is_weak() {
                    suggestions.push("List more relevant technical and soft skills".to_string());
                } else if strength == SectionStrength::Good {
                    suggestions.push("Group skills by category to make them easier to scan".to_string());
                }

                let missing = self.missing_keywords(text, profile);
                if !missing.is_empty() {
                    suggestions.push(format!("Consider adding: {}", missing.join(", ")));
                }
            }
            "summary" => {
                if word_count > 120 {
                    suggestions.push("Tighten your summary to at most 120 words".to_string());
                } else if strength.is_weak() {
                    suggestions.push("Expand your summary to 40-120 words focused on the target role".to_string());
                } else if strength == SectionStrength::Good {
                    suggestions.push("Tailor the summary to the target role".to_string());
                }
            }
            "education" => {
                if strength.is_weak() {
                    suggestions.push("Include degree, institution and graduation year".to_string());
                }
            }
            _ => {
                if strength.is_weak() {
                    suggestions.push(format!(
                        "Enhance the {} section with more relevant details and keywords",
                        name
                    ));
                }
            }
        }

        suggestions
    }

    /// Preferred keywords not already named in the section text
    fn missing_keywords(&self, text: &str, profile: &CompanyProfile) -> Vec<String> {
        let words = self.text_processor.words(text);
        profile
            .preferred_keywords
            .iter()
            .filter(|k| !self.text_processor.contains_phrase(k, &words))
            .take(self.suggestion_limit)
            .cloned()
            .collect()
    }
}

fn article(name: &str) -> &'static str {
    match name.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
