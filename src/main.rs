//! resume-ats: company-specific ATS simulation for resumes

use clap::Parser;
use colored::Colorize;
use log::{error, info};
use resume_ats::cli::{self, Cli, Commands, ConfigAction, ALL_COMPANIES};
use resume_ats::output::formatter::{resolve_save_path, save_report_to_file, ReportGenerator};
use resume_ats::processing::analyzer::ResumeAnalyzer;
use resume_ats::{AtsError, Config, InputManager, Result};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            company,
            mode,
            job,
            output,
            save,
            detailed,
        } => {
            cli::validate_file_extension(&resume, &["json", "pdf", "txt", "md"])
                .map_err(|e| AtsError::InvalidInput(format!("Resume file: {}", e)))?;
            if let Some(job) = &job {
                cli::validate_file_extension(job, &["txt", "md"])
                    .map_err(|e| AtsError::InvalidInput(format!("Job description file: {}", e)))?;
            }

            let output_format = match output {
                Some(output) => cli::parse_output_format(&output).map_err(AtsError::InvalidInput)?,
                None => config.output.format,
            };
            let mode = mode.unwrap_or_else(|| config.scoring.default_mode.as_str().to_string());

            let mut input_manager = InputManager::new()?;
            let resume_record = input_manager.load_resume(&resume).await?;
            let job_text = match &job {
                Some(job) => Some(input_manager.load_job_description(job).await?),
                None => None,
            };

            let analyzer = ResumeAnalyzer::from_config(&config)?;
            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                detailed || config.output.detailed,
                true,
            );

            let rendered = if company.eq_ignore_ascii_case(ALL_COMPANIES) {
                info!("Comparing {} against every company profile", resume.display());
                let report = analyzer.compare_all(&resume_record, job_text.as_deref(), &mode);
                generator.generate_comparison(&report, output_format)?
            } else {
                info!("Analyzing {} for {}", resume.display(), company);
                let result = analyzer.analyze(&resume_record, &company, job_text.as_deref(), &mode)?;
                generator.generate_analysis(&result, output_format)?
            };

            match save {
                Some(path) => {
                    let path = resolve_save_path(&path, output_format, &resume.to_string_lossy());
                    save_report_to_file(&rendered, &path)?;
                    println!("{} Report saved to {}", "✓".green(), path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Companies { detailed } => {
            let store = config.profile_store()?;
            println!("{}\n", "Company Profiles".bold());
            for profile in store.profiles() {
                println!("  • {} ({})", profile.company.cyan(), profile.category.label());
                if detailed {
                    let w = &profile.weights;
                    println!(
                        "      weights: keyword {:.2}, experience {:.2}, education {:.2}, skills {:.2}, format {:.2}",
                        w.keyword, w.experience, w.education, w.skills, w.format
                    );
                    println!("      strictness: {:.2}", profile.scoring_strictness);
                    let keywords: Vec<&str> = profile.preferred_keywords.iter().map(String::as_str).collect();
                    println!("      keywords: {}", keywords.join(", "));
                }
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => show_config(&config, &path),
                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&path)?;
                    println!("{} Configuration reset: {}", "✓".green(), path.display());
                }
                Some(ConfigAction::Path) => println!("{}", path.display()),
            }
        }
    }

    Ok(())
}

fn show_config(config: &Config, path: &Path) {
    println!("{}\n", "Current Configuration".bold());
    println!("File: {}", path.display());
    println!("\nScoring:");
    println!("  Default mode: {}", config.scoring.default_mode);
    println!("  Reference year: {}", config.reference_year());
    println!("  Company notes: {}", config.scoring.include_notes);
    println!("\nProfiles:");
    match &config.profiles.custom_file {
        Some(file) => println!(
            "  Custom file: {} ({})",
            file.display(),
            if config.profiles.replace_builtin { "replaces built-in" } else { "extends built-in" }
        ),
        None => println!("  Built-in only"),
    }
    println!("\nGap analysis:");
    println!("  Vocabulary filter: {}", config.gap.filter_to_vocabulary);
    println!("  Suggestion limit: {}", config.gap.suggestion_limit);
    println!("\nOutput:");
    println!("  Format: {:?}", config.output.format);
    println!("  Detailed: {}", config.output.detailed);
    println!("  Colors: {}", config.output.color_output);
}
