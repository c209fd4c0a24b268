//! Normalized resume record consumed by the scoring core

use crate::error::{AtsError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Closed education vocabulary, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    #[default]
    Unknown,
    HighSchool,
    Associate,
    Bachelors,
    Masters,
    Phd,
}

impl EducationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::Phd => "phd",
            EducationLevel::Masters => "masters",
            EducationLevel::Bachelors => "bachelors",
            EducationLevel::Associate => "associate",
            EducationLevel::HighSchool => "high_school",
            EducationLevel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EducationLevel {
    type Err = AtsError;

    /// Case-insensitive; accepts a few common spellings of each level.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        let level = match normalized.as_str() {
            "phd" | "ph.d" | "ph.d." | "doctorate" => EducationLevel::Phd,
            "masters" | "master" | "master's" | "mba" | "msc" | "ms" => EducationLevel::Masters,
            "bachelors" | "bachelor" | "bachelor's" | "bsc" | "bs" | "ba" | "btech" => {
                EducationLevel::Bachelors
            }
            "associate" | "associates" | "associate's" => EducationLevel::Associate,
            "high_school" | "highschool" | "secondary" => EducationLevel::HighSchool,
            "unknown" | "" => EducationLevel::Unknown,
            other => {
                return Err(AtsError::invalid_resume(
                    "education_level",
                    format!("unrecognized education level '{}'", other),
                ))
            }
        };
        Ok(level)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
}

impl ContactInfo {
    pub fn has_email(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.trim().is_empty())
    }
}

/// Normalized section entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub present: bool,
    pub text: String,
    pub word_count: usize,
}

impl SectionRecord {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            present: !text.trim().is_empty(),
            word_count: text.split_whitespace().count(),
            text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default)]
    pub raw_text: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub sections: BTreeMap<String, SectionRecord>,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub education_level: EducationLevel,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl ResumeRecord {
    /// Parse and validate a JSON resume document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Validate a loosely-shaped resume document field by field.
    ///
    /// Missing fields take their neutral defaults; fields that are present with the
    /// wrong shape are rejected with an error naming the field.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(AtsError::invalid_resume("$", "expected a JSON object"));
        };

        let contact_info = match root.get("contact_info") {
            None | Some(Value::Null) => ContactInfo::default(),
            Some(Value::Object(map)) => parse_contact_info(map)?,
            Some(_) => return Err(AtsError::invalid_resume("contact_info", "expected an object")),
        };

        let raw_text = optional_string(&root, "raw_text")?.unwrap_or_default();
        let skills = string_list(&root, "skills")?;
        let keywords = string_list(&root, "keywords")?;

        let sections = match root.get("sections") {
            None | Some(Value::Null) => BTreeMap::new(),
            Some(Value::Object(map)) => normalize_sections(map)?,
            Some(_) => return Err(AtsError::invalid_resume("sections", "expected an object")),
        };

        let experience_years = match root.get("experience_years") {
            None | Some(Value::Null) => 0,
            Some(value) => non_negative_integer(value)
                .ok_or_else(|| AtsError::invalid_resume("experience_years", "expected a non-negative integer"))?,
        };

        let education_level = match optional_string(&root, "education_level")? {
            Some(level) => level.parse()?,
            None => EducationLevel::Unknown,
        };

        Ok(Self {
            contact_info,
            raw_text,
            skills,
            sections,
            experience_years,
            education_level,
            keywords,
        })
    }

    /// Section entry by (case-insensitive) name
    pub fn section(&self, name: &str) -> Option<&SectionRecord> {
        self.sections.get(&name.to_lowercase())
    }

    /// True when the section exists and is flagged present
    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some_and(|s| s.present)
    }

    pub fn present_section_count(&self) -> usize {
        self.sections.values().filter(|s| s.present).count()
    }

    pub fn word_count(&self) -> usize {
        self.raw_text.split_whitespace().count()
    }
}

fn parse_contact_info(map: &Map<String, Value>) -> Result<ContactInfo> {
    Ok(ContactInfo {
        email: contact_field(map, "email", "emails")?,
        phone: contact_field(map, "phone", "phones")?,
        linkedin: contact_field(map, "linkedin", "linkedins")?,
    })
}

/// Accepts either a single string or a list of strings (first entry wins).
fn contact_field(map: &Map<String, Value>, singular: &str, plural: &str) -> Result<Option<String>> {
    for key in [singular, plural] {
        let field = format!("contact_info.{}", key);
        match map.get(key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => return Ok(Some(s.clone())),
            Some(Value::Array(items)) => {
                let mut first = None;
                for (idx, item) in items.iter().enumerate() {
                    match item {
                        Value::String(s) => {
                            if first.is_none() {
                                first = Some(s.clone());
                            }
                        }
                        _ => {
                            return Err(AtsError::invalid_resume(
                                format!("{}[{}]", field, idx),
                                "expected a string",
                            ))
                        }
                    }
                }
                if first.is_some() {
                    return Ok(first);
                }
            }
            Some(_) => return Err(AtsError::invalid_resume(field, "expected a string or list of strings")),
        }
    }
    Ok(None)
}

fn optional_string(map: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(AtsError::invalid_resume(key, "expected a string")),
    }
}

fn string_list(map: &Map<String, Value>, key: &str) -> Result<Vec<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(AtsError::invalid_resume(format!("{}[{}]", key, idx), "expected a string")),
            })
            .collect(),
        Some(_) => Err(AtsError::invalid_resume(key, "expected a list of strings")),
    }
}

fn non_negative_integer(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = value.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 {
        Some(f as u32)
    } else {
        None
    }
}

/// Bring every section value into the `{present, text, word_count}` shape.
fn normalize_sections(map: &Map<String, Value>) -> Result<BTreeMap<String, SectionRecord>> {
    let mut sections = BTreeMap::new();

    for (name, value) in map {
        let field = format!("sections.{}", name);
        let record = match value {
            Value::String(text) => SectionRecord::from_text(text.as_str()),
            Value::Object(entry) => {
                let text = match entry.get("text") {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(s)) => s.clone(),
                    Some(_) => return Err(AtsError::invalid_resume(format!("{}.text", field), "expected a string")),
                };
                let word_count = match entry.get("word_count") {
                    None | Some(Value::Null) => text.split_whitespace().count(),
                    Some(v) => non_negative_integer(v).map(|n| n as usize).ok_or_else(|| {
                        AtsError::invalid_resume(format!("{}.word_count", field), "expected a non-negative integer")
                    })?,
                };
                let present = match entry.get("present") {
                    None | Some(Value::Null) => !text.trim().is_empty(),
                    Some(Value::Bool(b)) => *b,
                    Some(_) => return Err(AtsError::invalid_resume(format!("{}.present", field), "expected a boolean")),
                };
                SectionRecord { present, text, word_count }
            }
            _ => return Err(AtsError::invalid_resume(field, "expected section text or a section record")),
        };
        let key = name.to_lowercase();
        if sections.contains_key(&key) {
            return Err(AtsError::invalid_resume(
                field,
                format!("duplicate section '{}' (section names are case-insensitive)", key),
            ));
        }
        sections.insert(key, record);
    }

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_case_colliding_sections_are_rejected() {
        let result = ResumeRecord::from_value(json!({
            "raw_text": "Led platform team",
            "sections": {
                "Experience": "Led platform team for four years",
                "experience": ""
            }
        }));

        match result {
            Err(AtsError::InvalidResume { field, reason }) => {
                assert!(field.eq_ignore_ascii_case("sections.experience"), "field {}", field);
                assert!(reason.contains("duplicate"));
            }
            other => panic!("expected duplicate section error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_value_normalizes_sections() {
        let resume = ResumeRecord::from_value(json!({
            "contact_info": {"email": "a@b.com"},
            "raw_text": "hello world",
            "skills": ["Python", "python"],
            "sections": {
                "Experience": "Built things at Acme",
                "education": {"present": true, "text": "BSc CS", "word_count": 2},
                "projects": ""
            },
            "experience_years": 4,
            "education_level": "Masters"
        }))
        .unwrap();

        let experience = resume.section("experience").unwrap();
        assert!(experience.present);
        assert_eq!(experience.word_count, 4);
        assert!(resume.has_section("education"));
        assert!(!resume.has_section("projects"));
        assert_eq!(resume.present_section_count(), 2);
        assert_eq!(resume.education_level, EducationLevel::Masters);
        assert_eq!(resume.skills.len(), 2);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let resume = ResumeRecord::from_value(json!({})).unwrap();

        assert_eq!(resume.experience_years, 0);
        assert_eq!(resume.education_level, EducationLevel::Unknown);
        assert!(!resume.contact_info.has_email());
        assert!(resume.sections.is_empty());
    }

    #[test]
    fn test_parser_style_contact_lists() {
        let resume = ResumeRecord::from_value(json!({
            "contact_info": {"emails": ["first@x.io", "second@x.io"], "phones": []}
        }))
        .unwrap();

        assert_eq!(resume.contact_info.email.as_deref(), Some("first@x.io"));
        assert_eq!(resume.contact_info.phone, None);
    }

    #[test]
    fn test_malformed_fields_are_named() {
        let cases = [
            (json!([1, 2]), "$"),
            (json!({"skills": "python"}), "skills"),
            (json!({"skills": ["python", 3]}), "skills[1]"),
            (json!({"experience_years": -2}), "experience_years"),
            (json!({"experience_years": 2.5}), "experience_years"),
            (json!({"education_level": "wizard"}), "education_level"),
            (json!({"sections": {"skills": 42}}), "sections.skills"),
            (json!({"sections": {"skills": {"present": "yes"}}}), "sections.skills.present"),
            (json!({"contact_info": {"email": 7}}), "contact_info.email"),
            (json!({"raw_text": ["a"]}), "raw_text"),
        ];

        for (value, expected_field) in cases {
            match ResumeRecord::from_value(value) {
                Err(AtsError::InvalidResume { field, .. }) => assert_eq!(field, expected_field),
                other => panic!("expected InvalidResume for {}, got {:?}", expected_field, other),
            }
        }
    }

    #[test]
    fn test_education_level_parsing() {
        assert_eq!("PhD".parse::<EducationLevel>().unwrap(), EducationLevel::Phd);
        assert_eq!("high school".parse::<EducationLevel>().unwrap(), EducationLevel::HighSchool);
        assert_eq!("BACHELORS".parse::<EducationLevel>().unwrap(), EducationLevel::Bachelors);
        assert!("astronaut".parse::<EducationLevel>().is_err());
    }
}
