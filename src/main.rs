//! resume-fit: resume and job description skill matching tool

use anyhow::{bail, Context};
use clap::Parser;
use colored::Colorize;
use log::{error, info, warn};
use resume_fit::cli::{self, Cli, Commands, ConfigAction, TaxonomyAction};
use resume_fit::config::{Config, OutputFormat};
use resume_fit::input::InputManager;
use resume_fit::output::formatter::{save_report_to_file, ReportGenerator};
use resume_fit::output::AnalysisReport;
use resume_fit::processing::analyzer::AnalysisEngine;
use resume_fit::processing::taxonomy::SkillCategory;
use resume_fit::processing::text_processor::TextProcessor;
use std::path::Path;
use std::process;

const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "markdown"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run(cli).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };

    match cli.command {
        Commands::Analyze {
            resume,
            job,
            output,
            save,
            detailed,
        } => {
            let format = match output {
                Some(name) => cli::parse_output_format(&name).map_err(anyhow::Error::msg)?,
                None => config.output.format,
            };
            analyze(&config, &resume, &job, format, save.as_deref(), detailed).await
        }

        Commands::Extract { file, limit, json } => extract(&config, &file, limit, json).await,

        Commands::Taxonomy { action } => {
            let engine = AnalysisEngine::new(&config).context("Failed to build skill taxonomy")?;
            match action {
                TaxonomyAction::Lookup { term } => lookup(&engine, &term),
                TaxonomyAction::List { category } => list(&engine, category.as_deref()),
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config)
                    .context("Failed to serialize configuration")?;
                println!("# {}", Config::config_path().display());
                println!("{}", content);
                Ok(())
            }
            Some(ConfigAction::Reset) => {
                Config::default().save().context("Failed to write default configuration")?;
                println!("Configuration reset to defaults at {}", Config::config_path().display());
                Ok(())
            }
            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
                Ok(())
            }
        },
    }
}

async fn analyze(
    config: &Config,
    resume: &Path,
    job: &Path,
    format: OutputFormat,
    save: Option<&Path>,
    detailed: bool,
) -> anyhow::Result<()> {
    info!("Starting resume fit analysis");

    cli::validate_file_extension(resume, SUPPORTED_EXTENSIONS)
        .map_err(|e| anyhow::anyhow!("Resume file: {}", e))?;
    cli::validate_file_extension(job, SUPPORTED_EXTENSIONS)
        .map_err(|e| anyhow::anyhow!("Job description file: {}", e))?;

    let mut input_manager = InputManager::new(config.input.clone())?;

    let resume_text = read_document(&mut input_manager, resume).await?;
    let job_text = read_document(&mut input_manager, job).await?;

    let validation = input_manager.validate_resume(&resume_text);
    if !validation.is_valid {
        warn!(
            "{} does not look like a resume ({} indicators, {} words)",
            resume.display(),
            validation.indicators_found,
            validation.word_count
        );
        for suggestion in &validation.suggestions {
            warn!("  {}", suggestion);
        }
    }

    let engine = AnalysisEngine::new(config).context("Failed to build analysis engine")?;
    let alignment = engine.analyze(&resume_text, &job_text);
    let report = AnalysisReport::from_alignment(
        alignment,
        &resume.to_string_lossy(),
        &job.to_string_lossy(),
    );

    let detailed = detailed || config.output.detailed;
    let generator = ReportGenerator::with_options(config.output.color_output, detailed, true, true);
    let content = generator.generate_report(&report, format)?;
    println!("{}", content);

    if let Some(path) = save {
        // Saved console reports are written without color codes
        let saved = if format == OutputFormat::Console {
            ReportGenerator::with_options(false, detailed, true, true)
                .generate_report(&report, format)?
        } else {
            content
        };
        save_report_to_file(&saved, path)
            .with_context(|| format!("Failed to save report to {}", path.display()))?;
        info!("Report saved to {}", path.display());
    }

    Ok(())
}

async fn extract(config: &Config, file: &Path, limit: usize, json: bool) -> anyhow::Result<()> {
    cli::validate_file_extension(file, SUPPORTED_EXTENSIONS).map_err(anyhow::Error::msg)?;

    let mut input_manager = InputManager::new(config.input.clone())?;
    let text = read_document(&mut input_manager, file).await?;

    let engine = AnalysisEngine::new(config).context("Failed to build analysis engine")?;
    let mut skills = engine.extract_skills(&text);
    skills.truncate(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&skills)?);
        return Ok(());
    }

    println!("{}", format!("Skills in {}", file.display()).bold());
    for (i, skill) in skills.iter().enumerate() {
        println!(
            "{:>3}. {:<28} {:>5.1}%  {:<22} {}",
            i + 1,
            skill.skill,
            skill.confidence * 100.0,
            skill.category.display_name(),
            skill.source.as_str()
        );
    }
    if skills.is_empty() {
        println!("No skills found.");
    }

    Ok(())
}

fn lookup(engine: &AnalysisEngine, term: &str) -> anyhow::Result<()> {
    let taxonomy = engine.taxonomy();
    let normalized = TextProcessor::new().canonicalize(term);
    let canonical = taxonomy.canonical_form(&normalized);
    let known = taxonomy.is_known_skill(&canonical);

    println!("Term:      {}", term);
    println!("Canonical: {}", canonical.bold());
    println!("Category:  {}", taxonomy.category_of(&canonical).display_name());
    println!("Known:     {}", if known { "yes".green() } else { "no".red() });

    let variants: Vec<String> = taxonomy.expand(&canonical).into_iter().collect();
    println!("Variants:  {}", variants.join(", "));

    Ok(())
}

fn list(engine: &AnalysisEngine, category: Option<&str>) -> anyhow::Result<()> {
    let taxonomy = engine.taxonomy();

    let categories: Vec<SkillCategory> = match category {
        Some(name) => vec![name.parse::<SkillCategory>().map_err(anyhow::Error::msg)?],
        None => SkillCategory::ALL.to_vec(),
    };

    for category in categories {
        let skills = taxonomy.skills_in(category);
        if skills.is_empty() {
            continue;
        }
        println!("{} ({})", category.display_name().bold(), skills.len());
        println!("  {}", skills.join(", "));
    }

    Ok(())
}

async fn read_document(input_manager: &mut InputManager, path: &Path) -> anyhow::Result<String> {
    let parsed = input_manager.parse(path).await;
    if !parsed.success {
        bail!(
            "Could not read {}: {}",
            path.display(),
            parsed.error.unwrap_or_default()
        );
    }

    info!(
        "Read {} ({} characters, {} words)",
        path.display(),
        parsed.char_count,
        parsed.word_count
    );
    Ok(parsed.text)
}
