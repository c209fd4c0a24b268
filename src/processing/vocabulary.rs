//! Known skill vocabulary used for skill extraction and job description filtering

use crate::error::{AtsError, Result};
use aho_corasick::{AhoCorasick, MatchKind};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    terms: Vec<String>,
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        let mut terms: Vec<String> = TECH_SKILLS
            .iter()
            .chain(SOFT_SKILLS)
            .chain(PRACTICE_SKILLS)
            .map(|s| s.to_string())
            .collect();
        terms.sort();
        terms.dedup();
        Self { terms }
    }
}

impl SkillVocabulary {
    /// Build a case-insensitive matcher preferring the longest term at each position
    pub fn matcher(&self) -> Result<AhoCorasick> {
        AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&self.terms)
            .map_err(|e| AtsError::InvalidInput(format!("Failed to build skill matcher: {}", e)))
    }

    /// Vocabulary terms found in `text` on word boundaries, in order of first appearance
    pub fn find_in(&self, matcher: &AhoCorasick, text: &str) -> Vec<String> {
        let bytes = text.as_bytes();
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for mat in matcher.find_iter(text) {
            let before_ok = mat.start() == 0 || !is_word_byte(bytes[mat.start() - 1]);
            let after_ok = mat.end() == bytes.len() || !is_word_byte(bytes[mat.end()]);
            if !(before_ok && after_ok) {
                continue;
            }
            let term = &self.terms[mat.pattern().as_usize()];
            if seen.insert(term.clone()) {
                found.push(term.clone());
            }
        }

        found
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+' || b == b'#'
}

const TECH_SKILLS: &[&str] = &[
    // Programming languages
    "rust", "python", "javascript", "typescript", "java", "c++", "c#", "go", "ruby", "php",
    "swift", "kotlin", "scala", "haskell", "matlab", "cobol", "sql",
    // Web
    "react", "vue", "angular", "html", "css", "node.js", "express", "spring", "hibernate",
    ".net",
    // Backend / infrastructure
    "docker", "kubernetes", "aws", "azure", "gcp", "terraform", "ansible", "jenkins",
    "devops", "microservices", "rest", "graphql", "grpc", "redis", "elasticsearch", "linux",
    "git", "cloud", "cloud computing", "distributed systems", "system design", "mainframe",
    "powershell", "active directory", "sharepoint", "office 365", "websphere",
    // Databases
    "postgresql", "mysql", "mongodb", "cassandra", "dynamodb", "oracle", "sql server", "db2",
    "databases",
    // Data / ML
    "machine learning", "deep learning", "tensorflow", "pytorch", "pandas", "numpy", "spark",
    "hadoop", "kafka", "airflow", "ai", "analytics", "data analysis", "data structures",
    "algorithms", "blockchain", "quantum", "watson",
    // Testing
    "testing", "qa", "selenium", "cypress", "junit", "pytest", "automation",
    // Enterprise
    "sap", "erp", "salesforce",
];

const SOFT_SKILLS: &[&str] = &[
    "leadership", "communication", "teamwork", "problem solving", "critical thinking",
    "collaboration", "mentoring", "presentation", "negotiation", "project management",
    "stakeholder management", "client management", "time management", "consulting",
    "strategy", "change management",
];

const PRACTICE_SKILLS: &[&str] = &[
    "agile", "scrum", "kanban", "jira", "ci/cd", "tdd", "programming", "scalability",
    "performance optimization", "digital transformation", "risk management", "compliance",
    "financial modeling", "trading", "security",
];
