//! Builds a resume record from extracted plain text

use crate::error::Result;
use crate::processing::resume::{ContactInfo, EducationLevel, ResumeRecord, SectionRecord};
use crate::processing::text_processor::TextProcessor;
use crate::processing::vocabulary::SkillVocabulary;
use aho_corasick::AhoCorasick;
use log::debug;
use regex::Regex;
use std::collections::BTreeMap;

const MAX_KEYWORDS: usize = 30;
const MAX_HEADING_WORDS: usize = 4;

/// Heading spellings for each canonical section name
const SECTION_HEADINGS: &[(&str, &[&str])] = &[
    ("summary", &["summary", "professional summary", "profile", "objective", "about me", "career objective"]),
    ("experience", &["experience", "work experience", "professional experience", "employment", "employment history", "work history"]),
    ("education", &["education", "academic background", "qualifications"]),
    ("skills", &["skills", "technical skills", "core competencies", "technologies"]),
    ("projects", &["projects", "personal projects", "key projects"]),
    ("certifications", &["certifications", "certificates", "licenses"]),
];

pub struct ResumeParser {
    text_processor: TextProcessor,
    vocabulary: SkillVocabulary,
    matcher: AhoCorasick,
    degrees: Vec<(EducationLevel, Regex)>,
}

impl ResumeParser {
    pub fn new() -> Result<Self> {
        Self::with_vocabulary(SkillVocabulary::default())
    }

    pub fn with_vocabulary(vocabulary: SkillVocabulary) -> Result<Self> {
        let matcher = vocabulary.matcher()?;

        // highest level first
        let degrees = vec![
            (EducationLevel::Phd, r"(?i)\b(ph\.?\s?d|doctorate|doctor of philosophy)\b"),
            (EducationLevel::Masters, r"(?i)\b(master'?s?|mba|m\.?sc|m\.s|m\.tech|mca)\b"),
            (EducationLevel::Bachelors, r"(?i)\b(bachelor'?s?|b\.?sc|b\.s|b\.a|b\.?tech|b\.e|bca|undergraduate degree)\b"),
            (EducationLevel::Associate, r"(?i)\b(associate'?s? degree|associate of)\b"),
            (EducationLevel::HighSchool, r"(?i)\b(high school|secondary school|ged)\b"),
        ]
        .into_iter()
        .map(|(level, pattern)| (level, Regex::new(pattern).expect("Invalid degree regex")))
        .collect();

        Ok(Self {
            text_processor: TextProcessor::new(),
            vocabulary,
            matcher,
            degrees,
        })
    }

    /// Parse extracted resume text into a resume record
    pub fn parse(&self, text: &str) -> ResumeRecord {
        let contact_info = ContactInfo {
            email: self.text_processor.find_email(text),
            phone: self.text_processor.find_phone(text),
            linkedin: self.text_processor.find_linkedin(text),
        };

        let skills = self.vocabulary.find_in(&self.matcher, text);
        let sections = self.detect_sections(text);
        let experience_years = self.estimate_experience(text);
        let education_level = self.detect_education(text);
        let keywords = self.text_processor.extract_keywords(text, MAX_KEYWORDS);

        debug!(
            "Parsed resume: {} skills, {} sections, {} years, education {}",
            skills.len(),
            sections.len(),
            experience_years,
            education_level
        );

        ResumeRecord {
            contact_info,
            raw_text: text.to_string(),
            skills,
            sections,
            experience_years,
            education_level,
            keywords,
        }
    }

    /// Span between the earliest and latest year mentioned
    pub fn estimate_experience(&self, text: &str) -> u32 {
        let years = self.text_processor.years(text);
        match (years.iter().min(), years.iter().max()) {
            (Some(min), Some(max)) => (max - min).max(0) as u32,
            _ => 0,
        }
    }

    /// Highest degree mentioned in the text
    pub fn detect_education(&self, text: &str) -> EducationLevel {
        self.degrees
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(level, _)| *level)
            .unwrap_or_default()
    }

    /// Split text into sections at recognized heading lines
    pub fn detect_sections(&self, text: &str) -> BTreeMap<String, SectionRecord> {
        let mut bodies: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        let mut current: Option<&str> = None;

        for line in text.lines() {
            if let Some(section) = heading_section(line) {
                current = Some(section);
                bodies.entry(section.to_string()).or_default();
                continue;
            }
            if let Some(section) = current {
                if !line.trim().is_empty() {
                    bodies.entry(section.to_string()).or_default().push(line.trim());
                }
            }
        }

        bodies
            .into_iter()
            .map(|(name, lines)| (name, SectionRecord::from_text(lines.join("\n"))))
            .collect()
    }
}

/// Canonical section name when `line` is a section heading
fn heading_section(line: &str) -> Option<&'static str> {
    let normalized = line
        .trim()
        .trim_start_matches('#')
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_lowercase();

    if normalized.is_empty() || normalized.split_whitespace().count() > MAX_HEADING_WORDS {
        return None;
    }

    SECTION_HEADINGS
        .iter()
        .find(|(_, headings)| headings.contains(&normalized.as_str()))
        .map(|(section, _)| *section)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Roe\n\
jane.roe@example.com | +1 555 123 4567 | linkedin.com/in/janeroe\n\
\n\
Summary\n\
Backend engineer focused on distributed systems.\n\
\n\
Work Experience:\n\
Senior Engineer, Acme 2019 - 2024\n\
Led the migration of billing to AWS using Python and Kubernetes.\n\
Engineer, Initech 2015 - 2019\n\
\n\
## Education\n\
M.Sc. Computer Science, 2015\n\
\n\
Skills\n\
Python, Rust, SQL, Docker\n";

    #[test]
    fn test_parse_contact_and_skills() {
        let parser = ResumeParser::new().unwrap();
        let resume = parser.parse(RESUME);

        assert_eq!(resume.contact_info.email.as_deref(), Some("jane.roe@example.com"));
        assert!(resume.contact_info.phone.is_some());
        assert!(resume.contact_info.linkedin.is_some());
        for skill in ["python", "rust", "sql", "docker", "aws", "kubernetes", "distributed systems"] {
            assert!(resume.skills.contains(&skill.to_string()), "missing {}", skill);
        }
        assert!(!resume.keywords.is_empty());
    }

    #[test]
    fn test_experience_span_and_education() {
        let parser = ResumeParser::new().unwrap();
        let resume = parser.parse(RESUME);

        assert_eq!(resume.experience_years, 9);
        assert_eq!(resume.education_level, EducationLevel::Masters);
        assert_eq!(parser.estimate_experience("no dates here"), 0);
        assert_eq!(parser.detect_education("Some coursework"), EducationLevel::Unknown);
        assert_eq!(parser.detect_education("PhD and MBA"), EducationLevel::Phd);
    }

    #[test]
    fn test_section_detection() {
        let parser = ResumeParser::new().unwrap();
        let sections = parser.detect_sections(RESUME);

        let names: Vec<&str> = sections.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["education", "experience", "skills", "summary"]);
        assert_eq!(sections["experience"].text.lines().count(), 3);
        assert_eq!(sections["skills"].text, "Python, Rust, SQL, Docker");
        assert!(sections.values().all(|s| s.present));
    }

    #[test]
    fn test_long_lines_are_not_headings() {
        assert_eq!(heading_section("Skills:"), Some("skills"));
        assert_eq!(heading_section("### Professional Experience"), Some("experience"));
        assert_eq!(heading_section("I have skills in many areas of work"), None);
    }
}
