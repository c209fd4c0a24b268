//! Output formatters for analysis and comparison results

use crate::config::OutputFormat;
use crate::error::Result;
use crate::processing::analyzer::{AnalysisResult, ComparisonReport};
use crate::processing::recommendations::Priority;
use crate::processing::sections::SectionStrength;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

const TOP_RECOMMENDATIONS: usize = 5;

/// Trait for rendering analysis results
pub trait OutputFormatter {
    fn format_analysis(&self, result: &AnalysisResult) -> Result<String>;
    fn format_comparison(&self, report: &ComparisonReport) -> Result<String>;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for structured data
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    detailed: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let (badge, color) = match score {
            s if s >= 80.0 => ("HIGH", Color::Green),
            s if s >= 60.0 => ("MODERATE", Color::Yellow),
            s if s >= 40.0 => ("LOW", Color::Red),
            _ => ("VERY LOW", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_priority(&self, priority: Priority) -> String {
        let color = match priority {
            Priority::High => Color::Red,
            Priority::Medium => Color::Yellow,
            Priority::Low => Color::Green,
        };
        self.colorize(&format!("[{}]", priority.label()), color)
    }

    fn strength_color(strength: SectionStrength) -> Color {
        match strength {
            SectionStrength::Excellent => Color::Green,
            SectionStrength::Good => Color::BrightGreen,
            SectionStrength::Fair => Color::Yellow,
            SectionStrength::Poor => Color::Red,
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_analysis(&self, result: &AnalysisResult) -> Result<String> {
        let mut out = String::new();
        let ats = &result.ats_results;

        out.push_str(&self.format_header(&format!("ATS ANALYSIS: {}", result.company), 1));
        out.push_str(&format!("Mode: {}\n", result.mode));
        for advisory in &result.advisories {
            out.push_str(&format!("{} {}\n", self.colorize("Note:", Color::Yellow), advisory));
        }

        out.push_str(&self.format_header("Summary", 2));
        out.push_str(&format!(
            "Overall Score: {:.1} {}\n",
            result.overall_score,
            self.format_score_badge(result.overall_score)
        ));
        out.push_str(&format!("ATS Score: {:.1}\n", ats.overall_ats_score));
        out.push_str(&format!("Verdict: {}\n", self.colorize(&ats.ats_recommendation, Color::Cyan)));
        let screening = if ats.passes_initial_screening {
            self.colorize("passed", Color::Green)
        } else {
            self.colorize("failed", Color::Red)
        };
        out.push_str(&format!("Initial screening: {}\n", screening));

        out.push_str(&self.format_header("Score Breakdown", 3));
        for (label, score) in [
            ("Keywords", ats.keyword_score),
            ("Experience", ats.experience_score),
            ("Education", ats.education_score),
            ("Skills", ats.skills_score),
            ("Format", ats.format_score),
        ] {
            out.push_str(&format!("  {:<12} {:>6.1}\n", label, score));
        }
        if ats.category_bonus > 0.0 {
            out.push_str(&format!("  {:<12} {:>+6.1}\n", "Bonus", ats.category_bonus));
        }

        let gaps = &result.keyword_gaps;
        out.push_str(&self.format_header("Keyword Match", 3));
        out.push_str(&format!("Company keywords: {:.1}%\n", gaps.keyword_match_percentage));
        if !gaps.matched_company_keywords.is_empty() {
            out.push_str(&format!(
                "  {} {}\n",
                self.colorize("Matched:", Color::Green),
                gaps.matched_company_keywords.join(", ")
            ));
        }
        if !gaps.missing_company_keywords.is_empty() {
            out.push_str(&format!(
                "  {} {}\n",
                self.colorize("Missing:", Color::Red),
                gaps.missing_company_keywords.join(", ")
            ));
        }
        if let Some(jd) = gaps.jd_skill_match_percentage {
            out.push_str(&format!("Job description skills: {:.1}%\n", jd));
            if !gaps.missing_jd_skills.is_empty() {
                out.push_str(&format!(
                    "  {} {}\n",
                    self.colorize("Missing:", Color::Red),
                    gaps.missing_jd_skills.join(", ")
                ));
            }
        }

        out.push_str(&self.format_header("Sections", 3));
        for (name, report) in &result.section_analysis {
            if !self.detailed && report.present && !report.strength.is_weak() {
                continue;
            }
            let status = if report.present { "present" } else { "missing" };
            out.push_str(&format!(
                "  {:<16} {} ({}, {} words)\n",
                name,
                self.colorize(report.strength.as_str(), Self::strength_color(report.strength)),
                status,
                report.word_count
            ));
            for suggestion in &report.suggestions {
                out.push_str(&format!("      - {}\n", suggestion));
            }
        }

        out.push_str(&self.format_header("Recommendations", 2));
        let limit = if self.detailed {
            result.recommendations.len()
        } else {
            TOP_RECOMMENDATIONS
        };
        if result.recommendations.is_empty() {
            out.push_str("No recommendations, the resume is well aligned.\n");
        }
        for (i, rec) in result.recommendations.iter().take(limit).enumerate() {
            out.push_str(&format!("{}. {} {} ({})\n", i + 1, self.format_priority(rec.priority), rec.title, rec.category));
            out.push_str(&format!("   {}\n", rec.description));
            if self.detailed {
                for item in &rec.action_items {
                    out.push_str(&format!("   • {}\n", item));
                }
            }
        }
        if result.recommendations.len() > limit {
            out.push_str(&format!(
                "... {} more, use --detailed to show all\n",
                result.recommendations.len() - limit
            ));
        }

        if !ats.company_specific_notes.is_empty() {
            out.push_str(&self.format_header(&format!("{} Tips", result.company), 3));
            for note in &ats.company_specific_notes {
                out.push_str(&format!("  • {}\n", note));
            }
        }

        Ok(out)
    }

    fn format_comparison(&self, report: &ComparisonReport) -> Result<String> {
        let mut out = String::new();

        out.push_str(&self.format_header("ATS COMPARISON", 1));
        out.push_str(&format!("Mode: {}\n", report.mode));
        for advisory in &report.advisories {
            out.push_str(&format!("{} {}\n", self.colorize("Note:", Color::Yellow), advisory));
        }
        out.push('\n');
        out.push_str(&format!("{:<4} {:<14} {:>8} {:>8}  {}\n", "#", "Company", "Overall", "ATS", "Verdict"));

        for (rank, result) in report.ranked().iter().enumerate() {
            out.push_str(&format!(
                "{:<4} {:<14} {:>8.1} {:>8.1}  {} {}\n",
                rank + 1,
                result.company,
                result.overall_score,
                result.ats_results.overall_ats_score,
                result.ats_results.ats_recommendation,
                self.format_score_badge(result.overall_score)
            ));
        }

        if !report.failures.is_empty() {
            out.push_str(&self.format_header("Failed", 3));
            for (company, error) in &report.failures {
                out.push_str(&format!("  {}: {}\n", self.colorize(company, Color::Red), error));
            }
        }

        if let Some(best) = report.best() {
            out.push_str(&format!(
                "\nBest match: {} ({:.1})\n",
                self.colorize(&best.company, Color::Green),
                best.overall_score
            ));
        }

        Ok(out)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_analysis(&self, result: &AnalysisResult) -> Result<String> {
        self.render(result)
    }

    fn format_comparison(&self, report: &ComparisonReport) -> Result<String> {
        self.render(report)
    }
}

impl MarkdownFormatter {
    pub fn new(detailed: bool) -> Self {
        Self { detailed }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_analysis(&self, result: &AnalysisResult) -> Result<String> {
        let mut md = String::new();
        let ats = &result.ats_results;

        md.push_str(&format!("# ATS Analysis: {}\n\n", result.company));
        md.push_str(&format!("**Mode:** {}  \n", result.mode));
        md.push_str(&format!("**Overall Score:** {:.1}/100  \n", result.overall_score));
        md.push_str(&format!("**ATS Score:** {:.1}/100  \n", ats.overall_ats_score));
        md.push_str(&format!("**Verdict:** {}  \n", ats.ats_recommendation));
        md.push_str(&format!(
            "**Initial screening:** {}\n\n",
            if ats.passes_initial_screening { "passed" } else { "failed" }
        ));

        for advisory in &result.advisories {
            md.push_str(&format!("> {}\n\n", advisory));
        }

        md.push_str("## Score Breakdown\n\n");
        md.push_str("| Component | Score |\n");
        md.push_str("|-----------|-------|\n");
        for (label, score) in [
            ("Keywords", ats.keyword_score),
            ("Experience", ats.experience_score),
            ("Education", ats.education_score),
            ("Skills", ats.skills_score),
            ("Format", ats.format_score),
        ] {
            md.push_str(&format!("| {} | {:.1} |\n", label, score));
        }
        md.push('\n');

        let gaps = &result.keyword_gaps;
        md.push_str("## Keyword Match\n\n");
        md.push_str(&format!("- Company keywords: {:.1}%\n", gaps.keyword_match_percentage));
        if !gaps.missing_company_keywords.is_empty() {
            md.push_str(&format!("- Missing: {}\n", gaps.missing_company_keywords.join(", ")));
        }
        if let Some(jd) = gaps.jd_skill_match_percentage {
            md.push_str(&format!("- Job description skills: {:.1}%\n", jd));
            if !gaps.missing_jd_skills.is_empty() {
                md.push_str(&format!("- Missing job skills: {}\n", gaps.missing_jd_skills.join(", ")));
            }
        }
        md.push('\n');

        md.push_str("## Sections\n\n");
        md.push_str("| Section | Present | Strength | Words |\n");
        md.push_str("|---------|---------|----------|-------|\n");
        for (name, report) in &result.section_analysis {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                name,
                if report.present { "yes" } else { "no" },
                report.strength,
                report.word_count
            ));
        }
        md.push('\n');

        md.push_str("## Recommendations\n\n");
        for (i, rec) in result.recommendations.iter().enumerate() {
            md.push_str(&format!("{}. **[{}] {}** ({})\n", i + 1, rec.priority, rec.title, rec.category));
            md.push_str(&format!("   {}\n", rec.description));
            if self.detailed {
                for item in &rec.action_items {
                    md.push_str(&format!("   - {}\n", item));
                }
            }
        }

        if !ats.company_specific_notes.is_empty() {
            md.push_str(&format!("\n## {} Tips\n\n", result.company));
            for note in &ats.company_specific_notes {
                md.push_str(&format!("- {}\n", note));
            }
        }

        Ok(md)
    }

    fn format_comparison(&self, report: &ComparisonReport) -> Result<String> {
        let mut md = String::new();

        md.push_str("# ATS Comparison\n\n");
        md.push_str(&format!("**Mode:** {}\n\n", report.mode));
        md.push_str("| Rank | Company | Overall | ATS | Verdict |\n");
        md.push_str("|------|---------|---------|-----|---------|\n");
        for (rank, result) in report.ranked().iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {:.1} | {:.1} | {} |\n",
                rank + 1,
                result.company,
                result.overall_score,
                result.ats_results.overall_ats_score,
                result.ats_results.ats_recommendation
            ));
        }

        if !report.failures.is_empty() {
            md.push_str("\n## Failed\n\n");
            for (company, error) in &report.failures {
                md.push_str(&format!("- **{}**: {}\n", company, error));
            }
        }

        Ok(md)
    }
}

impl ReportGenerator {
    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(detailed),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate_analysis(&self, result: &AnalysisResult, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_analysis(result)
    }

    pub fn generate_comparison(&self, report: &ComparisonReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_comparison(report)
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };
    format!("{}_ats{}.{}", base_name, timestamp_suffix, extension)
}

/// Where `--save` writes: the path itself, or a suggested file name inside it when it is a directory
pub fn resolve_save_path(save_path: &Path, format: OutputFormat, resume_name: &str) -> PathBuf {
    if save_path.is_dir() {
        save_path.join(suggest_filename(format, resume_name, true))
    } else {
        save_path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::analyzer::ResumeAnalyzer;
    use crate::processing::resume::{ContactInfo, ResumeRecord, SectionRecord};

    fn resume() -> ResumeRecord {
        ResumeRecord {
            contact_info: ContactInfo {
                email: Some("kim@example.com".to_string()),
                ..ContactInfo::default()
            },
            raw_text: "Kim Lee, Java and SQL developer working on cloud microservices since 2018".to_string(),
            skills: vec!["Java".to_string(), "SQL".to_string()],
            sections: [("skills".to_string(), SectionRecord::from_text("Java, SQL"))].into_iter().collect(),
            experience_years: 4,
            ..ResumeRecord::default()
        }
    }

    fn analysis() -> AnalysisResult {
        ResumeAnalyzer::new(2025)
            .unwrap()
            .analyze(&resume(), "TCS", Some("Java and Spring"), "rule")
            .unwrap()
    }

    #[test]
    fn test_console_output_without_colors() {
        let output = ConsoleFormatter::new(false, true).format_analysis(&analysis()).unwrap();

        assert!(output.contains("ATS ANALYSIS: TCS"));
        assert!(output.contains("Overall Score:"));
        assert!(output.contains("Missing: "));
        assert!(output.contains("Job description skills: 50.0%"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_json_output_parses_back() {
        let result = analysis();
        let json = JsonFormatter::new(true).format_analysis(&result).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_markdown_output() {
        let md = MarkdownFormatter::new(false).format_analysis(&analysis()).unwrap();
        assert!(md.starts_with("# ATS Analysis: TCS"));
        assert!(md.contains("| Keywords |"));
        assert!(md.contains("## Recommendations"));
    }

    #[test]
    fn test_comparison_rendering() {
        let report = ResumeAnalyzer::new(2025).unwrap().compare_all(&resume(), None, "smart");
        let generator = ReportGenerator::with_options(false, false, false);

        let console = generator.generate_comparison(&report, OutputFormat::Console).unwrap();
        assert!(console.contains("ATS COMPARISON"));
        assert!(console.contains("Best match:"));

        let md = generator.generate_comparison(&report, OutputFormat::Markdown).unwrap();
        assert!(md.matches("| ").count() >= report.results.len());

        let json = generator.generate_comparison(&report, OutputFormat::Json).unwrap();
        let parsed: ComparisonReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(OutputFormat::Markdown, "cv/jane.pdf", false), "jane_ats.md");
        assert!(suggest_filename(OutputFormat::Json, "jane.json", true).ends_with(".json"));
    }

    #[test]
    fn test_save_path_inside_directory() {
        let dir = tempfile::TempDir::new().unwrap();

        let resolved = resolve_save_path(dir.path(), OutputFormat::Markdown, "cv/jane.pdf");
        assert_eq!(resolved.parent(), Some(dir.path()));
        let name = resolved.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("jane_ats_"));
        assert!(name.ends_with(".md"));

        let file = dir.path().join("report.json");
        assert_eq!(resolve_save_path(&file, OutputFormat::Json, "jane.pdf"), file);
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reports").join("out.md");
        save_report_to_file("# Report", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Report");
    }
}
