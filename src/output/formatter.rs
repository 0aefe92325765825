//! Output formatters for console, JSON and Markdown reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::AnalysisReport;
use crate::processing::gap_analyzer::{Priority, SkillGroup};
use crate::processing::matcher::MatchScorer;
use crate::processing::skill_extractor::ExtractedSkill;
use colored::{Color, Colorize};
use std::path::Path;

/// Number of extracted skills listed per document in detailed output
const DETAILED_SKILL_LIMIT: usize = 15;

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colored score bands
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for structured output
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that dispatches to the formatter for each output format
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
        let level = MatchScorer::match_level(score);
        let color = score_color(score);

        if self.use_colors {
            format!("[{}]", level.to_uppercase().color(color).bold())
        } else {
            format!("[{}]", level.to_uppercase())
        }
    }

    fn format_priority(&self, priority: Priority) -> String {
        let (icon, color) = match priority {
            Priority::High => ("[*]", Color::Red),
            Priority::Medium => ("[-]", Color::Yellow),
            Priority::Low => ("[+]", Color::Green),
        };

        self.colorize(&format!("{} {}", icon, priority), color)
    }

    fn format_group(&self, output: &mut String, title: &str, group: &SkillGroup, color: Color) {
        output.push_str(&self.format_header(&format!("{} ({})", title, group.count), 3));

        if group.count == 0 {
            output.push_str("  (none)\n");
            return;
        }

        if self.detailed {
            for (category, skills) in &group.by_category {
                output.push_str(&format!(
                    "  {}: {}\n",
                    category.display_name(),
                    self.colorize(&skills.join(", "), color)
                ));
            }
        } else {
            output.push_str(&format!("  {}\n", self.colorize(&group.skills.join(", "), color)));
        }
    }

    fn format_extracted(&self, output: &mut String, title: &str, skills: &[ExtractedSkill]) {
        output.push_str(&self.format_header(title, 3));

        for skill in AnalysisReport::top_skills(skills, DETAILED_SKILL_LIMIT) {
            output.push_str(&format!(
                "  {:<28} {:>5.1}%  {:<22} {}\n",
                skill.skill,
                skill.confidence * 100.0,
                skill.category.display_name(),
                skill.source.as_str()
            ));
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let result = &report.match_result;
        let gap = &report.gap_result;

        output.push_str(&self.format_header("RESUME FIT ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Match Score", 2));
        output.push_str(&format!(
            "Overall Score: {} {}\n",
            self.colorize(
                &format!("{:.1}%", result.overall_score),
                score_color(result.overall_score)
            ),
            self.format_score_badge(result.overall_score)
        ));
        output.push_str(&format!("  Skill Match:     {:.1}%\n", result.skill_match_score));
        output.push_str(&format!("  Text Similarity: {:.1}%\n", result.text_similarity_score));
        output.push_str(&format!(
            "  Skills Covered:  {}/{}\n",
            result.matched_skills_count, result.total_required_skills
        ));
        output.push_str(&format!("\n{}\n", result.explanation));
        output.push_str(&format!("Summary: {}\n", self.colorize(&gap.summary, Color::Cyan)));

        output.push_str(&self.format_header("Skill Gap", 2));
        self.format_group(&mut output, "Matched Skills", &gap.matched_skills, Color::Green);
        self.format_group(&mut output, "Missing Skills", &gap.missing_skills, Color::Red);
        self.format_group(&mut output, "Additional Skills", &gap.extra_skills, Color::Blue);

        if !gap.insights.is_empty() {
            output.push_str(&self.format_header("Insights", 2));
            for insight in &gap.insights {
                output.push_str(&format!("  • {}\n", insight));
            }
        }

        if !gap.recommendations.is_empty() {
            output.push_str(&self.format_header("Recommendations", 2));
            for (i, rec) in gap.recommendations.iter().enumerate() {
                output.push_str(&format!(
                    "{}. {} {}\n",
                    i + 1,
                    self.format_priority(rec.priority),
                    self.colorize(&rec.category, Color::Cyan)
                ));
                output.push_str(&format!("   {}\n", rec.reason));
                output.push_str(&format!("   Skills: {}\n", rec.skills.join(", ")));
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("Extracted Skills", 2));
            self.format_extracted(&mut output, "Resume", &report.resume_skills);
            self.format_extracted(&mut output, "Job Description", &report.job_skills);
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_group(output: &mut String, title: &str, group: &SkillGroup) {
        output.push_str(&format!("### {} ({})\n\n", title, group.count));

        if group.count == 0 {
            output.push_str("_None_\n\n");
            return;
        }

        for (category, skills) in &group.by_category {
            output.push_str(&format!("- **{}:** {}\n", category.display_name(), skills.join(", ")));
        }
        output.push('\n');
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let result = &report.match_result;
        let gap = &report.gap_result;

        output.push_str("# Resume Fit Analysis Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Job:** `{}`\n\n",
                file_label(&report.metadata.resume_file),
                file_label(&report.metadata.job_file)
            ));
        }

        output.push_str("## Match Score\n\n");
        output.push_str(&format!(
            "**Overall Score:** {:.1}% ({})\n\n",
            result.overall_score,
            MatchScorer::match_level(result.overall_score)
        ));
        output.push_str("| Component | Score |\n");
        output.push_str("|-----------|-------|\n");
        output.push_str(&format!("| Skill Match | {:.1}% |\n", result.skill_match_score));
        output.push_str(&format!("| Text Similarity | {:.1}% |\n", result.text_similarity_score));
        output.push_str(&format!(
            "| Skills Covered | {}/{} |\n\n",
            result.matched_skills_count, result.total_required_skills
        ));
        output.push_str(&format!("{}\n\n", result.explanation));
        output.push_str(&format!("**Summary:** {}\n\n", gap.summary));

        output.push_str("## Skill Gap\n\n");
        Self::markdown_group(&mut output, "Matched Skills", &gap.matched_skills);
        Self::markdown_group(&mut output, "Missing Skills", &gap.missing_skills);
        Self::markdown_group(&mut output, "Additional Skills", &gap.extra_skills);

        if !gap.insights.is_empty() {
            output.push_str("## Insights\n\n");
            for insight in &gap.insights {
                output.push_str(&format!("- {}\n", insight));
            }
            output.push('\n');
        }

        if !gap.recommendations.is_empty() {
            output.push_str("## Recommendations\n\n");
            output.push_str("| Priority | Category | Skills | Reason |\n");
            output.push_str("|----------|----------|--------|--------|\n");
            for rec in &gap.recommendations {
                output.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    rec.priority,
                    rec.category,
                    rec.skills.join(", "),
                    rec.reason
                ));
            }
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        };

        formatter.format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
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

    format!("{}_analysis{}.{}", base_name, timestamp_suffix, extension)
}

fn score_color(score: f64) -> Color {
    if score >= 80.0 {
        Color::Green
    } else if score >= 60.0 {
        Color::BrightGreen
    } else if score >= 40.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn file_label(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::processing::analyzer::AnalysisEngine;

    fn sample_report() -> AnalysisReport {
        let engine = AnalysisEngine::new(&Config::default()).unwrap();
        let alignment = engine.analyze(
            "Python developer with Django, PostgreSQL and Docker. Led agile teams.",
            "Looking for Python and Django engineers who know Kubernetes and AWS.",
        );
        AnalysisReport::from_alignment(alignment, "cv/resume.txt", "jobs/backend.md")
    }

    #[test]
    fn test_console_output_without_colors() {
        let report = sample_report();
        let output = ConsoleFormatter::new(false, true).format_report(&report).unwrap();

        assert!(output.contains("RESUME FIT ANALYSIS"));
        assert!(output.contains(&report.match_result.explanation));
        assert!(output.contains("Missing Skills"));
        assert!(output.contains("kubernetes"));
        assert!(output.contains("Extracted Skills"));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_json_output_round_trips() {
        let report = sample_report();
        let json = JsonFormatter::new(false).format_report(&report).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["match_result"]["overall_score"].is_number());
        assert!(value["gap_result"]["missing_skills"]["by_category"]["cloud_devops"].is_array());
        assert_eq!(value["metadata"]["resume_file"], "cv/resume.txt");
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_markdown_output() {
        let report = sample_report();
        let output = MarkdownFormatter::new(true).format_report(&report).unwrap();

        assert!(output.starts_with("# Resume Fit Analysis Report"));
        assert!(output.contains("**Resume:** `resume.txt` | **Job:** `backend.md`"));
        assert!(output.contains("## Recommendations"));
        assert!(output.contains("| High | Cloud Devops |"));
    }

    #[test]
    fn test_generator_dispatch_and_filenames() {
        let generator = ReportGenerator::with_options(false, false, true, false);
        let report = sample_report();

        let json = generator.generate_report(&report, OutputFormat::Json).unwrap();
        assert!(json.starts_with('{'));
        assert_eq!(generator.json_formatter.supports_format(), OutputFormat::Json);
        assert_eq!(generator.console_formatter.supports_format(), OutputFormat::Console);

        let markdown = generator.generate_report(&report, OutputFormat::Markdown).unwrap();
        assert!(!markdown.contains("**Generated:**"));

        assert_eq!(
            suggest_filename(OutputFormat::Markdown, "cv/jane_resume.pdf", false),
            "jane_resume_analysis.md"
        );
    }

    #[test]
    fn test_save_report_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/out/report.md");

        save_report_to_file("# Report", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Report");
    }
}
