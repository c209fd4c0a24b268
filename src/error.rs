//! Error handling for the ATS simulator

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The resume record does not have the expected shape
    #[error("Invalid resume field `{field}`: {reason}")]
    InvalidResume { field: String, reason: String },

    /// A company profile violates its construction invariants
    #[error("Invalid profile for {company}: {reason}")]
    InvalidProfile { company: String, reason: String },

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

impl AtsError {
    pub fn invalid_resume(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AtsError::InvalidResume {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_profile(company: impl Into<String>, reason: impl Into<String>) -> Self {
        AtsError::InvalidProfile {
            company: company.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AtsError>;

impl From<toml::de::Error> for AtsError {
    fn from(err: toml::de::Error) -> Self {
        AtsError::Configuration(err.to_string())
    }
}
