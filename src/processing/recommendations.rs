//! Priority-ordered improvement recommendations

use crate::processing::engine::AtsResult;
use crate::processing::gap::KeywordGaps;
use crate::processing::profiles::CompanyProfile;
use crate::processing::resume::ResumeRecord;
use crate::processing::sections::{SectionReport, SectionStrength};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;

const CRITICAL_ATS_SCORE: f64 = 40.0;
const LOW_ATS_SCORE: f64 = 60.0;
const MANY_MISSING_KEYWORDS: usize = 5;
const LOW_FORMAT_SCORE: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort weight, higher first
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationCategory {
    #[serde(rename = "ATS Score")]
    AtsScore,
    Keywords,
    Content,
    Experience,
    Format,
}

impl fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecommendationCategory::AtsScore => "ATS Score",
            RecommendationCategory::Keywords => "Keywords",
            RecommendationCategory::Content => "Content",
            RecommendationCategory::Experience => "Experience",
            RecommendationCategory::Format => "Format",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: RecommendationCategory,
    pub title: String,
    pub description: String,
    pub action_items: Vec<String>,
}

/// Collects candidate recommendations and orders them by priority
#[derive(Debug, Default)]
pub struct RecommendationSynthesizer;

impl RecommendationSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Candidates in generation order, stably sorted by priority weight descending.
    pub fn synthesize(
        &self,
        resume: &ResumeRecord,
        profile: &CompanyProfile,
        ats: &AtsResult,
        gaps: &KeywordGaps,
        sections: &BTreeMap<String, SectionReport>,
    ) -> Vec<Recommendation> {
        let mut candidates = Vec::new();

        if let Some(rec) = score_recommendation(ats, profile) {
            candidates.push(rec);
        }
        candidates.extend(keyword_recommendations(gaps, profile));
        candidates.extend(section_recommendations(sections));
        if let Some(rec) = experience_recommendation(resume, profile) {
            candidates.push(rec);
        }
        if let Some(rec) = format_recommendation(ats) {
            candidates.push(rec);
        }

        // sort_by_key is stable, equal priorities keep generation order
        candidates.sort_by_key(|rec| Reverse(rec.priority.weight()));
        candidates
    }
}

fn score_recommendation(ats: &AtsResult, profile: &CompanyProfile) -> Option<Recommendation> {
    let score = ats.overall_ats_score;
    let priority = if score < CRITICAL_ATS_SCORE {
        Priority::High
    } else if score < LOW_ATS_SCORE {
        Priority::Medium
    } else {
        return None;
    };

    Some(Recommendation {
        priority,
        category: RecommendationCategory::AtsScore,
        title: "Improve overall ATS compatibility".to_string(),
        description: format!(
            "Your ATS score for {} is {:.1}. {}.",
            profile.company, score, ats.ats_recommendation
        ),
        action_items: vec![
            format!("Mirror the language {} uses in its job postings", profile.company),
            "Use standard section headings".to_string(),
            "Move key skills and technologies near the top of the resume".to_string(),
        ],
    })
}

fn keyword_recommendations(gaps: &KeywordGaps, profile: &CompanyProfile) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    let missing = &gaps.missing_company_keywords;
    if !missing.is_empty() {
        let priority = if missing.len() > MANY_MISSING_KEYWORDS {
            Priority::High
        } else {
            Priority::Medium
        };
        recs.push(Recommendation {
            priority,
            category: RecommendationCategory::Keywords,
            title: "Add missing company keywords".to_string(),
            description: format!(
                "{} of the keywords {} screens for do not appear in your resume.",
                missing.len(),
                profile.company
            ),
            action_items: missing.clone(),
        });
    }

    if !gaps.missing_jd_skills.is_empty() {
        recs.push(Recommendation {
            priority: Priority::Medium,
            category: RecommendationCategory::Keywords,
            title: "Add missing job description skills".to_string(),
            description: "Incorporate these skills from the job description where you genuinely have them."
                .to_string(),
            action_items: gaps.missing_jd_skills.clone(),
        });
    }

    recs
}

fn section_recommendations(sections: &BTreeMap<String, SectionReport>) -> Vec<Recommendation> {
    sections
        .iter()
        .filter_map(|(name, report)| {
            let priority = if !report.present {
                Priority::High
            } else {
                match report.strength {
                    SectionStrength::Poor => Priority::Medium,
                    SectionStrength::Fair => Priority::Low,
                    SectionStrength::Good | SectionStrength::Excellent => return None,
                }
            };

            let description = if report.present {
                format!("The {} section is rated {}.", name, report.strength)
            } else {
                format!("Your resume has no {} section.", name)
            };

            let mut action_items = report.suggestions.clone();
            if action_items.is_empty() {
                action_items.push(format!("Expand the {} section with relevant details", name));
            }

            Some(Recommendation {
                priority,
                category: RecommendationCategory::Content,
                title: format!("Improve the {} section", name),
                description,
                action_items,
            })
        })
        .collect()
}

fn experience_recommendation(resume: &ResumeRecord, profile: &CompanyProfile) -> Option<Recommendation> {
    let mid = profile.experience_threshold("mid");
    if resume.experience_years >= mid {
        return None;
    }

    Some(Recommendation {
        priority: Priority::Medium,
        category: RecommendationCategory::Experience,
        title: "Strengthen experience evidence".to_string(),
        description: format!(
            "{} years of experience is below the {}-year mid-level bar at {}.",
            resume.experience_years, mid, profile.company
        ),
        action_items: vec![
            "Include internships, freelance and open source work".to_string(),
            "Highlight projects that show equivalent responsibility".to_string(),
        ],
    })
}

fn format_recommendation(ats: &AtsResult) -> Option<Recommendation> {
    if ats.format_score >= LOW_FORMAT_SCORE {
        return None;
    }

    Some(Recommendation {
        priority: Priority::Low,
        category: RecommendationCategory::Format,
        title: "Fix resume formatting".to_string(),
        description: format!("Format score is {:.1}.", ats.format_score),
        action_items: vec![
            "Include a professional email address".to_string(),
            "Use the standard Experience, Education and Skills headings".to_string(),
            "Keep the layout simple and single-column".to_string(),
        ],
    })
}
