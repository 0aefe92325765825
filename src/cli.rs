//! CLI interface for resume fit analysis

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-fit")]
#[command(about = "Resume and job description skill matching tool")]
#[command(
    long_about = "Extract skills from resumes and job descriptions, score how well they fit, and report missing skills with prioritized recommendations"
)]
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
    /// Score a resume against a job description
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (PDF, TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Output format: console, json, markdown (defaults to the configured format)
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show skills by category and the extracted skill lists
        #[arg(short, long)]
        detailed: bool,
    },

    /// Extract ranked skills from a single document
    Extract {
        /// Path to document (PDF, TXT, MD)
        file: PathBuf,

        /// Maximum number of skills to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Print skills as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect the skill taxonomy
    Taxonomy {
        #[command(subcommand)]
        action: TaxonomyAction,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum TaxonomyAction {
    /// Show how a term resolves: canonical form, category and variants
    Lookup {
        /// Skill term, e.g. "k8s" or "Expert Python 3"
        term: String,
    },

    /// List known skills
    List {
        /// Only list skills in this category (e.g. "web_frontend")
        #[arg(long)]
        category: Option<String>,
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
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
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
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_command() {
        let cli = Cli::parse_from([
            "resume-fit", "analyze", "--resume", "cv.pdf", "--job", "job.md", "-o", "json",
            "--detailed", "-v",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze { resume, output, detailed, save, .. } => {
                assert_eq!(resume, PathBuf::from("cv.pdf"));
                assert_eq!(output.as_deref(), Some("json"));
                assert!(detailed);
                assert!(save.is_none());
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_parse_taxonomy_lookup() {
        let cli = Cli::parse_from(["resume-fit", "taxonomy", "lookup", "k8s"]);
        assert!(matches!(
            cli.command,
            Commands::Taxonomy { action: TaxonomyAction::Lookup { ref term } } if term == "k8s"
        ));
    }

    #[test]
    fn test_parse_taxonomy_list_with_config() {
        let cli = Cli::parse_from([
            "resume-fit", "taxonomy", "list", "--category", "web_frontend", "-c", "fit.toml",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("fit.toml")));
        match cli.command {
            Commands::Taxonomy { action: TaxonomyAction::List { category } } => {
                assert_eq!(category.as_deref(), Some("web_frontend"));
            }
            _ => panic!("expected taxonomy list command"),
        }
    }

    #[test]
    fn test_output_format_and_extensions() {
        assert_eq!(parse_output_format("MD"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("html").is_err());

        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf", "txt"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), &["pdf", "txt"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());
    }
}
