//! Company-specific ATS simulation and resume scoring

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::{Config, OutputFormat};
pub use error::{AtsError, Result};
pub use input::InputManager;
pub use processing::analyzer::{AnalysisResult, ComparisonReport, ResumeAnalyzer};
pub use processing::engine::{AtsResult, ScoringEngine, ScoringMode};
pub use processing::profiles::{CompanyProfile, ProfileStore};
pub use processing::resume::ResumeRecord;
