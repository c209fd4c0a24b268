//! Configuration management for the ATS simulator

use crate::error::{AtsError, Result};
use crate::processing::engine::ScoringMode;
use crate::processing::profiles::ProfileStore;
use crate::processing::sections::DEFAULT_SUGGESTION_LIMIT;
use chrono::Datelike;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub profiles: ProfilesConfig,
    pub gap: GapConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub default_mode: ScoringMode,
    /// Year the recency bonus is measured from; the current year when unset
    pub reference_year: Option<i32>,
    pub include_notes: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilesConfig {
    /// TOML file with additional `[[profiles]]` entries
    pub custom_file: Option<PathBuf>,
    /// Use only the custom profiles instead of extending the built-in table
    pub replace_builtin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapConfig {
    /// Restrict job description skills to the known skill vocabulary
    pub filter_to_vocabulary: bool,
    /// Missing keywords listed in skills section suggestions
    pub suggestion_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
    Markdown,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_mode: ScoringMode::Rule,
            reference_year: None,
            include_notes: true,
        }
    }
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            filter_to_vocabulary: true,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    /// A missing file is created with default values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| AtsError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            info!("Creating default configuration at {}", config_path.display());
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AtsError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ats")
            .join("config.toml")
    }

    pub fn reference_year(&self) -> i32 {
        self.scoring
            .reference_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    /// Build the profile store: built-in profiles, extended or replaced by the custom file.
    ///
    /// Custom profiles are loaded leniently so one bad entry only fails its own company.
    pub fn profile_store(&self) -> Result<ProfileStore> {
        let Some(custom_file) = &self.profiles.custom_file else {
            return Ok(ProfileStore::builtin());
        };

        let mut builder = ProfileStore::builder();
        if !self.profiles.replace_builtin {
            builder = builder.with_builtin();
        }

        info!("Loading custom profiles from {}", custom_file.display());
        Ok(builder.profiles_from_file(custom_file)?.build_lenient())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = Config::load(Some(&path)).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scoring]\ndefault_mode = \"smart\"\nreference_year = 2024\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.scoring.default_mode, ScoringMode::Smart);
        assert_eq!(config.reference_year(), 2024);
        assert!(config.scoring.include_notes);
        assert_eq!(config.output.format, OutputFormat::Console);
        assert_eq!(config.gap.suggestion_limit, DEFAULT_SUGGESTION_LIMIT);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scoring]\ndefault_mode = \"psychic\"\n").unwrap();

        assert!(matches!(Config::load(Some(&path)), Err(AtsError::Configuration(_))));
    }

    #[test]
    fn test_profile_store_extend_and_replace() {
        let dir = TempDir::new().unwrap();
        let profiles = dir.path().join("profiles.toml");
        std::fs::write(
            &profiles,
            r#"
[[profiles]]
company = "Hooli"
category = "big_tech"
preferred_keywords = ["python"]
required_skills = ["python"]
scoring_strictness = 0.5

[profiles.weights]
keyword = 0.2
experience = 0.2
education = 0.2
skills = 0.2
format = 0.2
"#,
        )
        .unwrap();

        let mut config = Config::default();
        assert_eq!(config.profile_store().unwrap().len(), ProfileStore::builtin().len());

        config.profiles.custom_file = Some(profiles);
        let extended = config.profile_store().unwrap();
        assert_eq!(extended.len(), ProfileStore::builtin().len() + 1);
        assert!(extended.lookup("hooli").is_some());

        config.profiles.replace_builtin = true;
        let replaced = config.profile_store().unwrap();
        assert_eq!(replaced.list_companies(), vec!["Hooli", "Generic"]);
    }
}
