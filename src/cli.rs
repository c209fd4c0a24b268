//! CLI interface for the ATS resume scorer

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Company name that scores the resume against every known profile
pub const ALL_COMPANIES: &str = "all";

#[derive(Parser)]
#[command(name = "resume-ats")]
#[command(about = "Simulate company applicant tracking systems against a resume")]
#[command(long_about = "Score a resume the way a company's ATS would: keyword, experience, education, skills and format scores, section analysis, keyword gaps and prioritized recommendations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume against one company, or all of them
    Analyze {
        /// Path to resume file (JSON, PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Company profile to score against, or "all" to compare every profile
        #[arg(long, default_value = "Generic")]
        company: String,

        /// Scoring mode: rule or smart (defaults to the configured mode)
        #[arg(short, long)]
        mode: Option<String>,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to a file, or into a directory under a generated name
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show every section and recommendation
        #[arg(short, long)]
        detailed: bool,
    },

    /// List available company profiles
    Companies {
        /// Show weights and keywords for each profile
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_defaults() {
        let cli = Cli::parse_from(["resume-ats", "analyze", "--resume", "cv.json"]);
        match cli.command {
            Commands::Analyze { company, mode, job, output, .. } => {
                assert_eq!(company, "Generic");
                assert!(mode.is_none());
                assert!(job.is_none());
                assert!(output.is_none());
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("MD"), Ok(OutputFormat::Markdown));
        assert_eq!(parse_output_format("json"), Ok(OutputFormat::Json));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf", "txt"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), &["pdf"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());
    }
}
