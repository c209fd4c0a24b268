//! Keyword gap analysis against a company profile and an optional job description

use crate::error::Result;
use crate::processing::engine::{percentage, round2};
use crate::processing::profiles::CompanyProfile;
use crate::processing::resume::ResumeRecord;
use crate::processing::text_processor::TextProcessor;
use crate::processing::vocabulary::SkillVocabulary;
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordGaps {
    pub keyword_match_percentage: f64,
    pub matched_company_keywords: Vec<String>,
    pub missing_company_keywords: Vec<String>,
    /// `None` when no job description was supplied
    pub jd_skill_match_percentage: Option<f64>,
    pub matched_jd_skills: Vec<String>,
    pub missing_jd_skills: Vec<String>,
}

pub struct GapAnalyzer {
    text_processor: TextProcessor,
    vocabulary: Option<(SkillVocabulary, AhoCorasick)>,
}

impl GapAnalyzer {
    /// Job description skills are restricted to the default skill vocabulary.
    pub fn new() -> Result<Self> {
        Self::with_vocabulary(Some(SkillVocabulary::default()))
    }

    /// `None` keeps every content word of the job description.
    pub fn with_vocabulary(vocabulary: Option<SkillVocabulary>) -> Result<Self> {
        let vocabulary = match vocabulary {
            Some(vocabulary) => {
                let matcher = vocabulary.matcher()?;
                Some((vocabulary, matcher))
            }
            None => None,
        };

        Ok(Self {
            text_processor: TextProcessor::new(),
            vocabulary,
        })
    }

    pub fn analyze(
        &self,
        resume: &ResumeRecord,
        profile: &CompanyProfile,
        job_description: Option<&str>,
    ) -> KeywordGaps {
        let segments = self.resume_segments(resume);

        let (matched_company_keywords, missing_company_keywords): (Vec<String>, Vec<String>) = profile
            .preferred_keywords
            .iter()
            .map(|k| k.to_lowercase())
            .partition(|k| self.mentioned(k, &segments));

        let keyword_match_percentage = round2(percentage(
            matched_company_keywords.len() as f64,
            profile.preferred_keywords.len(),
        ));

        let mut gaps = KeywordGaps {
            keyword_match_percentage,
            matched_company_keywords,
            missing_company_keywords,
            ..KeywordGaps::default()
        };

        if let Some(description) = job_description.filter(|d| !d.trim().is_empty()) {
            let jd_skills = self.extract_jd_skills(description);
            let total = jd_skills.len();
            let (matched, missing): (Vec<String>, Vec<String>) = jd_skills
                .into_iter()
                .partition(|skill| self.mentioned(skill, &segments));

            gaps.jd_skill_match_percentage = Some(round2(percentage(matched.len() as f64, total)));
            gaps.matched_jd_skills = matched;
            gaps.missing_jd_skills = missing;
        }

        gaps
    }

    /// Skills named in a job description, in order of first appearance
    pub fn extract_jd_skills(&self, description: &str) -> Vec<String> {
        match &self.vocabulary {
            Some((vocabulary, matcher)) => vocabulary.find_in(matcher, description),
            None => self.text_processor.vocabulary(description),
        }
    }

    /// Literal words of the resume text, then the words of each listed skill
    fn resume_segments(&self, resume: &ResumeRecord) -> Vec<Vec<String>> {
        std::iter::once(resume.raw_text.as_str())
            .chain(resume.skills.iter().map(String::as_str))
            .map(|text| self.text_processor.words(text))
            .collect()
    }

    /// A phrase matches when its words appear consecutively within one segment
    fn mentioned(&self, phrase: &str, segments: &[Vec<String>]) -> bool {
        segments
            .iter()
            .any(|words| self.text_processor.contains_phrase(phrase, words))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::profiles::ProfileStore;
    use std::collections::BTreeSet;

    fn profile_with(keywords: &[&str]) -> CompanyProfile {
        let mut profile = ProfileStore::builtin().generic().clone();
        profile.preferred_keywords = keywords.iter().map(|s| s.to_string()).collect();
        profile
    }

    fn resume(text: &str, skills: &[&str]) -> ResumeRecord {
        ResumeRecord {
            raw_text: text.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..ResumeRecord::default()
        }
    }

    #[test]
    fn test_word_matching_is_stricter_than_substring() {
        let analyzer = GapAnalyzer::new().unwrap();
        let profile = profile_with(&["java", "sql", "cloud"]);
        // "javascript" and "mysql" contain the keywords but are different words
        let gaps = analyzer.analyze(&resume("JavaScript developer using MySQL in the Cloud", &[]), &profile, None);

        assert_eq!(gaps.matched_company_keywords, vec!["cloud"]);
        assert_eq!(gaps.missing_company_keywords, vec!["java", "sql"]);
        assert!((gaps.keyword_match_percentage - 33.33).abs() < 1e-9);
    }

    #[test]
    fn test_skills_list_counts_as_resume_words() {
        let analyzer = GapAnalyzer::new().unwrap();
        let profile = profile_with(&["distributed systems", "python"]);
        let gaps = analyzer.analyze(&resume("Backend engineer", &["Python", "Distributed Systems"]), &profile, None);

        assert_eq!(gaps.keyword_match_percentage, 100.0);
        assert!(gaps.missing_company_keywords.is_empty());
    }

    #[test]
    fn test_multi_word_keywords_need_adjacent_words() {
        let analyzer = GapAnalyzer::new().unwrap();
        let profile = profile_with(&["leadership principles", "distributed systems"]);
        let text = "Showed leadership across teams. Wrote design principles for distributed systems.";
        let gaps = analyzer.analyze(&resume(text, &["Leadership"]), &profile, None);

        assert_eq!(gaps.matched_company_keywords, vec!["distributed systems"]);
        assert_eq!(gaps.missing_company_keywords, vec!["leadership principles"]);
    }

    #[test]
    fn test_empty_denominators_yield_zero() {
        let analyzer = GapAnalyzer::new().unwrap();
        let mut profile = profile_with(&[]);
        profile.preferred_keywords = BTreeSet::new();

        let gaps = analyzer.analyze(&resume("anything", &[]), &profile, Some("We value kindness."));
        assert_eq!(gaps.keyword_match_percentage, 0.0);
        assert_eq!(gaps.jd_skill_match_percentage, Some(0.0));
        assert!(gaps.matched_jd_skills.is_empty());
    }

    #[test]
    fn test_job_description_skills() {
        let analyzer = GapAnalyzer::new().unwrap();
        let profile = profile_with(&["python"]);
        let jd = "Seeking a Rust engineer with Kubernetes and PostgreSQL experience. Python is a plus.";
        let gaps = analyzer.analyze(&resume("Wrote Rust services on Kubernetes", &["python"]), &profile, Some(jd));

        assert_eq!(gaps.matched_jd_skills, vec!["rust", "kubernetes", "python"]);
        assert_eq!(gaps.missing_jd_skills, vec!["postgresql"]);
        assert_eq!(gaps.jd_skill_match_percentage, Some(75.0));
    }

    #[test]
    fn test_job_description_without_vocabulary_filter() {
        let analyzer = GapAnalyzer::with_vocabulary(None).unwrap();
        let skills = analyzer.extract_jd_skills("Strong communication and teamwork required");

        assert_eq!(skills, vec!["communication", "teamwork"]);
    }

    #[test]
    fn test_missing_job_description() {
        let analyzer = GapAnalyzer::new().unwrap();
        let gaps = analyzer.analyze(&resume("text", &[]), &profile_with(&["text"]), Some("   "));

        assert_eq!(gaps.jd_skill_match_percentage, None);
        assert_eq!(gaps.keyword_match_percentage, 100.0);
    }
}
