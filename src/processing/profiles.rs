//! Company ATS profiles and the read-only profile store

use crate::error::{AtsError, Result};
use crate::processing::resume::EducationLevel;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

/// Identifier of the fallback profile
pub const GENERIC_COMPANY: &str = "Generic";

/// Allowed deviation of the weight sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Capability tag driving bonus rules, section rules and canned notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProfileCategory {
    BigTech,
    Consulting,
    Finance,
    ItServices,
    #[default]
    General,
}

impl ProfileCategory {
    /// Employers whose education score compounds with a tier bonus
    pub fn is_elite(self) -> bool {
        matches!(self, ProfileCategory::BigTech)
    }

    /// Employers that expect a summary section
    pub fn is_selective(self) -> bool {
        matches!(self, ProfileCategory::BigTech | ProfileCategory::Finance)
    }

    /// Terms whose presence earns the smart-mode category bonus
    pub fn bonus_terms(self) -> &'static [&'static str] {
        match self {
            ProfileCategory::BigTech => &["cloud", "aws", "azure", "gcp", "kubernetes"],
            ProfileCategory::Consulting => &["consulting", "client", "stakeholder", "strategy"],
            ProfileCategory::Finance => &["finance", "financial", "banking", "trading", "risk"],
            ProfileCategory::ItServices | ProfileCategory::General => &[],
        }
    }

    /// Skill tokens needed for an excellent skills section
    pub fn skills_threshold(self) -> usize {
        if self.is_selective() {
            12
        } else {
            8
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProfileCategory::BigTech => "Big Tech",
            ProfileCategory::Consulting => "Consulting",
            ProfileCategory::Finance => "Finance",
            ProfileCategory::ItServices => "IT Services",
            ProfileCategory::General => "General",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub keyword: f64,
    pub experience: f64,
    pub education: f64,
    pub skills: f64,
    pub format: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.keyword + self.experience + self.education + self.skills + self.format
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company: String,
    #[serde(default)]
    pub category: ProfileCategory,
    pub weights: ScoringWeights,
    pub preferred_keywords: BTreeSet<String>,
    pub required_skills: BTreeSet<String>,
    #[serde(default)]
    pub experience_requirements: BTreeMap<String, u32>,
    #[serde(default)]
    pub education_preferences: Vec<EducationLevel>,
    pub scoring_strictness: f64,
    #[serde(default)]
    pub common_filters: Vec<String>,
    /// keyword -> alternative phrasings that earn partial credit
    #[serde(default)]
    pub synonyms: BTreeMap<String, Vec<String>>,
    /// Advisory notes shown with the ATS result; category notes apply when empty
    #[serde(default)]
    pub notes: Vec<String>,
}

impl CompanyProfile {
    /// Minimum years for an experience tier. `entry`, `mid` and `senior`
    /// default to 0, 3 and 5 when the profile does not define them.
    pub fn experience_threshold(&self, tier: &str) -> u32 {
        self.experience_requirements
            .get(tier)
            .copied()
            .unwrap_or(match tier {
                "mid" => 3,
                "senior" => 5,
                _ => 0,
            })
    }

    pub fn synonyms_for(&self, keyword: &str) -> &[String] {
        self.synonyms
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(keyword))
            .map(|(_, synonyms)| synonyms.as_slice())
            .unwrap_or(&[])
    }

    /// Check construction invariants.
    pub fn validate(&self) -> Result<()> {
        if self.company.trim().is_empty() {
            return Err(AtsError::invalid_profile("<unnamed>", "company identifier is empty"));
        }

        let w = &self.weights;
        let all = [w.keyword, w.experience, w.education, w.skills, w.format];
        if all.iter().any(|x| !x.is_finite() || *x < 0.0) {
            return Err(AtsError::invalid_profile(&self.company, "weights must be finite and non-negative"));
        }

        let sum = w.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AtsError::invalid_profile(
                &self.company,
                format!("weights sum to {:.3}, expected 1.0", sum),
            ));
        }

        if !(0.0..=1.0).contains(&self.scoring_strictness) {
            return Err(AtsError::invalid_profile(
                &self.company,
                format!("scoring strictness {} is outside [0, 1]", self.scoring_strictness),
            ));
        }

        Ok(())
    }
}

/// On-disk format of a custom profile file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileFile {
    pub profiles: Vec<CompanyProfile>,
}

/// Immutable, ordered table of company profiles
#[derive(Debug, Clone)]
pub struct ProfileStore {
    profiles: Vec<CompanyProfile>,
    index: HashMap<String, usize>,
    generic: usize,
}

impl ProfileStore {
    /// Store holding the built-in profiles
    pub fn builtin() -> Self {
        let profiles = builtin_profiles();
        Self::assemble(profiles)
    }

    pub fn builder() -> ProfileStoreBuilder {
        ProfileStoreBuilder::default()
    }

    /// Company identifiers in insertion order
    pub fn list_companies(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.company.as_str()).collect()
    }

    /// Profile by identifier (case-insensitive), without fallback
    pub fn lookup(&self, company: &str) -> Option<&CompanyProfile> {
        self.index
            .get(&company.trim().to_lowercase())
            .map(|&idx| &self.profiles[idx])
    }

    /// Profile by identifier, falling back to the Generic profile
    pub fn get_profile(&self, company: &str) -> &CompanyProfile {
        self.lookup(company).unwrap_or_else(|| self.generic())
    }

    pub fn generic(&self) -> &CompanyProfile {
        &self.profiles[self.generic]
    }

    pub fn profiles(&self) -> &[CompanyProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    fn assemble(mut profiles: Vec<CompanyProfile>) -> Self {
        if !profiles.iter().any(|p| p.company.eq_ignore_ascii_case(GENERIC_COMPANY)) {
            profiles.push(generic_profile());
        }

        let index: HashMap<String, usize> = profiles
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.company.to_lowercase(), idx))
            .collect();
        let generic = index[&GENERIC_COMPANY.to_lowercase()];

        Self {
            profiles,
            index,
            generic,
        }
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Builds a new [`ProfileStore`]; existing stores are never mutated.
#[derive(Debug, Default)]
pub struct ProfileStoreBuilder {
    profiles: Vec<CompanyProfile>,
}

impl ProfileStoreBuilder {
    /// Start from the built-in table
    pub fn with_builtin(mut self) -> Self {
        for profile in builtin_profiles() {
            self = self.profile(profile);
        }
        self
    }

    /// Add a profile, replacing an existing one with the same identifier in place
    pub fn profile(mut self, profile: CompanyProfile) -> Self {
        match self
            .profiles
            .iter()
            .position(|p| p.company.eq_ignore_ascii_case(&profile.company))
        {
            Some(idx) => {
                debug!("Replacing profile {}", profile.company);
                self.profiles[idx] = profile;
            }
            None => self.profiles.push(profile),
        }
        self
    }

    pub fn profiles<I: IntoIterator<Item = CompanyProfile>>(mut self, profiles: I) -> Self {
        for profile in profiles {
            self = self.profile(profile);
        }
        self
    }

    /// Add profiles from a TOML profile file body
    pub fn profiles_from_toml(self, content: &str) -> Result<Self> {
        let file: ProfileFile = toml::from_str(content)
            .map_err(|e| AtsError::Configuration(format!("Failed to parse profile file: {}", e)))?;
        Ok(self.profiles(file.profiles))
    }

    /// Add profiles from a TOML profile file on disk
    pub fn profiles_from_file(self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        self.profiles_from_toml(&content)
    }

    /// Build, rejecting the whole table if any profile is invalid.
    pub fn build(self) -> Result<ProfileStore> {
        for profile in &self.profiles {
            profile.validate()?;
        }
        Ok(ProfileStore::assemble(self.profiles))
    }

    /// Build, keeping invalid profiles so they fail individually at scoring time.
    pub fn build_lenient(self) -> ProfileStore {
        for profile in &self.profiles {
            if let Err(e) = profile.validate() {
                warn!("Keeping invalid profile, it will fail when scored: {}", e);
            }
        }
        ProfileStore::assemble(self.profiles)
    }
}

/// Alternative phrasings for common keywords
pub fn default_synonyms() -> BTreeMap<String, Vec<String>> {
    let table: &[(&str, &[&str])] = &[
        ("aws", &["amazon web services"]),
        ("gcp", &["google cloud"]),
        ("azure", &["microsoft cloud"]),
        ("ai", &["artificial intelligence"]),
        ("machine learning", &["deep learning", "predictive modeling", "neural network"]),
        ("cloud", &["saas", "iaas", "paas"]),
        ("cloud computing", &["cloud infrastructure", "cloud platform"]),
        ("distributed systems", &["distributed computing", "large-scale systems"]),
        ("scalability", &["high availability", "horizontal scaling", "scalable"]),
        ("microservices", &["service-oriented architecture", "micro-services"]),
        ("system design", &["software architecture", "systems architecture"]),
        ("data structures", &["hash maps", "linked lists", "binary trees"]),
        ("algorithms", &["algorithmic", "dynamic programming"]),
        ("devops", &["ci/cd", "continuous integration", "continuous delivery"]),
        ("agile", &["scrum", "kanban", "sprint"]),
        ("testing", &["test automation", "unit tests", "quality assurance"]),
        ("qa", &["quality assurance"]),
        ("automation", &["automated", "scripting"]),
        ("consulting", &["advisory", "client engagement"]),
        ("digital transformation", &["modernization", "digitization"]),
        ("change management", &["organizational change"]),
        ("analytics", &["business intelligence", "data analysis"]),
        ("leadership", &["led a team", "team lead", "managed a team"]),
        ("communication", &["presented", "presentation", "stakeholder updates"]),
        ("teamwork", &["collaborated", "cross-functional"]),
        ("project management", &["program management", "project delivery"]),
        ("problem solving", &["troubleshooting", "root cause analysis"]),
        ("programming", &["software development", "coding"]),
        ("customer obsession", &["customer focus", "customer-centric"]),
        ("ownership", &["owned", "end-to-end responsibility"]),
        ("bias for action", &["moved quickly", "rapid delivery"]),
        ("performance optimization", &["performance tuning", "latency reduction"]),
        ("risk management", &["risk assessment", "risk mitigation"]),
        ("financial modeling", &["valuation", "forecasting models"]),
        ("c#", &["csharp", "c sharp"]),
        ("c++", &["cpp"]),
        (".net", &["dotnet", "asp.net"]),
        ("sql", &["postgresql", "mysql", "t-sql"]),
    ];

    table
        .iter()
        .map(|(keyword, synonyms)| {
            (
                keyword.to_string(),
                synonyms.iter().map(|s| s.to_string()).collect(),
            )
        })
        .collect()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn tiers(items: &[(&str, u32)]) -> BTreeMap<String, u32> {
    items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn weights(keyword: f64, experience: f64, education: f64, skills: f64, format: f64) -> ScoringWeights {
    ScoringWeights {
        keyword,
        experience,
        education,
        skills,
        format,
    }
}

fn generic_profile() -> CompanyProfile {
    use EducationLevel::*;

    CompanyProfile {
        company: GENERIC_COMPANY.to_string(),
        category: ProfileCategory::General,
        weights: weights(0.30, 0.25, 0.20, 0.20, 0.05),
        preferred_keywords: set(&[
            "programming", "problem solving", "teamwork", "communication", "leadership",
            "project management",
        ]),
        required_skills: set(&["programming", "problem solving", "communication"]),
        experience_requirements: tiers(&[("entry", 0), ("mid", 3), ("senior", 5)]),
        education_preferences: vec![Bachelors, Masters],
        scoring_strictness: 0.70,
        common_filters: strings(&["skills", "experience", "education"]),
        synonyms: default_synonyms(),
        notes: Vec::new(),
    }
}

/// Built-in profile table, in display order
pub fn builtin_profiles() -> Vec<CompanyProfile> {
    use EducationLevel::*;
    use ProfileCategory::*;

    vec![
        CompanyProfile {
            company: "Amazon".to_string(),
            category: BigTech,
            weights: weights(0.35, 0.25, 0.15, 0.20, 0.05),
            preferred_keywords: set(&[
                "aws", "cloud", "microservices", "distributed systems", "scalability",
                "leadership principles", "customer obsession", "ownership", "bias for action",
                "java", "python", "sql", "data structures", "algorithms", "system design",
            ]),
            required_skills: set(&[
                "programming", "problem solving", "system design", "cloud computing", "databases",
            ]),
            experience_requirements: tiers(&[("entry", 0), ("mid", 3), ("senior", 5), ("principal", 8)]),
            education_preferences: vec![Bachelors, Masters, Phd],
            scoring_strictness: 0.80,
            common_filters: strings(&["leadership", "innovation", "scale"]),
            synonyms: default_synonyms(),
            notes: strings(&[
                "Emphasize leadership principles and customer impact",
                "Include metrics and scale of systems worked on",
            ]),
        },
        CompanyProfile {
            company: "Google".to_string(),
            category: BigTech,
            weights: weights(0.30, 0.25, 0.20, 0.20, 0.05),
            preferred_keywords: set(&[
                "machine learning", "ai", "tensorflow", "algorithms", "data structures", "python",
                "c++", "java", "go", "distributed systems", "gcp", "research", "innovation",
                "scalability", "performance optimization",
            ]),
            required_skills: set(&[
                "programming", "algorithms", "data structures", "system design", "problem solving",
            ]),
            experience_requirements: tiers(&[("entry", 0), ("mid", 3), ("senior", 5), ("staff", 8)]),
            education_preferences: vec![Masters, Phd, Bachelors],
            scoring_strictness: 0.85,
            common_filters: strings(&["innovation", "research", "impact"]),
            synonyms: default_synonyms(),
            notes: strings(&[
                "Highlight algorithmic thinking and innovation",
                "Include research publications if any",
            ]),
        },
        CompanyProfile {
            company: "Microsoft".to_string(),
            category: BigTech,
            weights: weights(0.32, 0.28, 0.18, 0.18, 0.04),
            preferred_keywords: set(&[
                "azure", "c#", ".net", "sql server", "office 365", "powershell",
                "active directory", "sharepoint", "teams", "cloud computing", "devops", "agile",
            ]),
            required_skills: set(&["programming", "cloud platforms", "collaboration", "problem solving"]),
            experience_requirements: tiers(&[("entry", 0), ("mid", 2), ("senior", 5), ("principal", 7)]),
            education_preferences: vec![Bachelors, Masters],
            scoring_strictness: 0.75,
            common_filters: strings(&["collaboration", "diversity", "growth mindset"]),
            synonyms: default_synonyms(),
            notes: Vec::new(),
        },
        CompanyProfile {
            company: "TCS".to_string(),
            category: ItServices,
            weights: weights(0.25, 0.30, 0.25, 0.15, 0.05),
            preferred_keywords: set(&[
                "java", "spring", "hibernate", "sql", "oracle", "agile", "scrum", "banking",
                "finance", "erp", "sap", "mainframe", "cobol", "testing", "qa",
            ]),
            required_skills: set(&["programming", "database management", "testing", "domain knowledge"]),
            experience_requirements: tiers(&[("entry", 0), ("mid", 3), ("senior", 6), ("lead", 8)]),
            education_preferences: vec![Bachelors, Masters],
            scoring_strictness: 0.70,
            common_filters: strings(&["domain expertise", "client handling", "delivery"]),
            synonyms: default_synonyms(),
            notes: Vec::new(),
        },
        CompanyProfile {
            company: "Infosys".to_string(),
            category: ItServices,
            weights: weights(0.28, 0.32, 0.22, 0.15, 0.03),
            preferred_keywords: set(&[
                "java", "python", "sql", "agile", "devops", "cloud", "digital transformation",
                "automation", "ai", "machine learning", "consulting",
            ]),
            required_skills: set(&["programming", "consulting", "client interaction", "problem solving"]),
            experience_requirements: tiers(&[("entry", 0), ("mid", 2), ("senior", 5), ("principal", 8)]),
            education_preferences: vec![Bachelors, Masters],
            scoring_strictness: 0.72,
            common_filters: strings(&["innovation", "digital", "transformation"]),
            synonyms: default_synonyms(),
            notes: Vec::new(),
        },
        CompanyProfile {
            company: "Wipro".to_string(),
            category: ItServices,
            weights: weights(0.26, 0.30, 0.24, 0.16, 0.04),
            preferred_keywords: set(&[
                "java", "c++", "sql", "testing", "automation", "agile", "healthcare", "banking",
                "retail", "cloud", "devops", "sap",
            ]),
            required_skills: set(&["programming", "domain knowledge", "testing", "project management"]),
            experience_requirements: tiers(&[("entry", 0), ("mid", 3), ("senior", 5), ("manager", 7)]),
            education_preferences: vec![Bachelors, Masters],
            scoring_strictness: 0.68,
            common_filters: strings(&["domain expertise", "quality", "delivery"]),
            synonyms: default_synonyms(),
            notes: Vec::new(),
        },
        CompanyProfile {
            company: "IBM".to_string(),
            category: Consulting,
            weights: weights(0.30, 0.25, 0.20, 0.20, 0.05),
            preferred_keywords: set(&[
                "watson", "ai", "machine learning", "cloud", "blockchain", "quantum", "mainframe",
                "db2", "websphere", "consulting", "transformation",
            ]),
            required_skills: set(&["consulting", "enterprise solutions", "ai/ml", "problem solving"]),
            experience_requirements: tiers(&[("entry", 0), ("mid", 3), ("senior", 6), ("executive", 10)]),
            education_preferences: vec![Masters, Phd, Bachelors],
            scoring_strictness: 0.78,
            common_filters: strings(&["innovation", "research", "enterprise"]),
            synonyms: default_synonyms(),
            notes: Vec::new(),
        },
        CompanyProfile {
            company: "Accenture".to_string(),
            category: Consulting,
            weights: weights(0.27, 0.28, 0.20, 0.20, 0.05),
            preferred_keywords: set(&[
                "consulting", "digital transformation", "cloud", "agile", "change management",
                "strategy", "analytics", "ai", "automation", "client",
            ]),
            required_skills: set(&["consulting", "client management", "strategy", "digital transformation"]),
            experience_requirements: tiers(&[("entry", 0), ("mid", 2), ("senior", 4), ("manager", 6)]),
            education_preferences: vec![Masters, Bachelors],
            scoring_strictness: 0.75,
            common_filters: strings(&["consulting", "strategy", "transformation"]),
            synonyms: default_synonyms(),
            notes: Vec::new(),
        },
        CompanyProfile {
            company: "JPMorgan".to_string(),
            category: Finance,
            weights: weights(0.28, 0.27, 0.20, 0.20, 0.05),
            preferred_keywords: set(&[
                "java", "python", "sql", "risk management", "trading", "financial modeling",
                "compliance", "cloud", "data analysis", "microservices", "security",
            ]),
            required_skills: set(&["programming", "problem solving", "data analysis", "communication"]),
            experience_requirements: tiers(&[("entry", 0), ("mid", 3), ("senior", 6), ("vice_president", 10)]),
            education_preferences: vec![Masters, Bachelors, Phd],
            scoring_strictness: 0.80,
            common_filters: strings(&["risk", "regulation", "precision"]),
            synonyms: default_synonyms(),
            notes: Vec::new(),
        },
        generic_profile(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_weights_sum_to_one() {
        for profile in builtin_profiles() {
            assert!(
                (profile.weights.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE,
                "{} weights sum to {}",
                profile.company,
                profile.weights.sum()
            );
            profile.validate().unwrap();
        }
    }

    #[test]
    fn test_builtin_store_passes_strict_build() {
        let store = ProfileStore::builder().with_builtin().build().unwrap();
        assert_eq!(store.len(), ProfileStore::builtin().len());
    }

    #[test]
    fn test_list_companies_order_and_generic() {
        let store = ProfileStore::builtin();
        let companies = store.list_companies();

        assert_eq!(companies.first(), Some(&"Amazon"));
        assert_eq!(companies.last(), Some(&GENERIC_COMPANY));
        assert!(companies.contains(&GENERIC_COMPANY));
    }

    #[test]
    fn test_unknown_company_falls_back_to_generic() {
        let store = ProfileStore::builtin();

        let unknown = store.get_profile("Initech");
        let generic = store.get_profile(GENERIC_COMPANY);
        assert!(std::ptr::eq(unknown, generic));
        assert!(store.lookup("Initech").is_none());
        assert_eq!(store.get_profile("google").company, "Google");
    }

    #[test]
    fn test_experience_threshold_defaults() {
        let mut profile = generic_profile();
        profile.experience_requirements.clear();

        assert_eq!(profile.experience_threshold("entry"), 0);
        assert_eq!(profile.experience_threshold("mid"), 3);
        assert_eq!(profile.experience_threshold("senior"), 5);
    }

    #[test]
    fn test_validate_rejects_bad_weights_and_strictness() {
        let mut profile = generic_profile();
        profile.weights.keyword = 0.6;
        assert!(matches!(profile.validate(), Err(AtsError::InvalidProfile { .. })));

        let mut profile = generic_profile();
        profile.scoring_strictness = 1.5;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_builder_strict_and_lenient() {
        let mut broken = generic_profile();
        broken.company = "Broken".to_string();
        broken.weights.format = 0.5;

        assert!(ProfileStore::builder().with_builtin().profile(broken.clone()).build().is_err());

        let store = ProfileStore::builder().with_builtin().profile(broken).build_lenient();
        assert!(store.lookup("Broken").is_some());
    }

    #[test]
    fn test_builder_adds_generic_when_missing() {
        let mut only = generic_profile();
        only.company = "Solo".to_string();

        let store = ProfileStore::builder().profile(only).build().unwrap();
        assert_eq!(store.list_companies(), vec!["Solo", GENERIC_COMPANY]);
    }

    #[test]
    fn test_profiles_from_toml() {
        let content = r#"
[[profiles]]
company = "Globex"
category = "finance"
preferred_keywords = ["python", "risk management"]
required_skills = ["python"]
education_preferences = ["masters", "bachelors"]
scoring_strictness = 0.6

[profiles.weights]
keyword = 0.3
experience = 0.3
education = 0.2
skills = 0.15
format = 0.05

[profiles.experience_requirements]
entry = 0
mid = 2
senior = 4
"#;

        let store = ProfileStore::builder()
            .with_builtin()
            .profiles_from_toml(content)
            .unwrap()
            .build()
            .unwrap();

        let globex = store.get_profile("Globex");
        assert_eq!(globex.category, ProfileCategory::Finance);
        assert_eq!(globex.experience_threshold("mid"), 2);
        assert_eq!(globex.education_preferences, vec![EducationLevel::Masters, EducationLevel::Bachelors]);
        assert_eq!(store.list_companies().last(), Some(&"Globex"));
    }
}
