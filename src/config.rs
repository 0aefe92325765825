//! Configuration management for the resume fit analyzer

use crate::error::{Result, ResumeFitError};
use crate::processing::taxonomy::SkillCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub scoring: ScoringConfig,
    pub taxonomy: TaxonomyConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum term weight for a statistically scored term to count as a skill
    pub min_skill_confidence: f64,
    pub tfidf_max_features: usize,
    pub ngram_min: usize,
    pub ngram_max: usize,
    pub min_word_length: usize,
    pub max_word_length: usize,
    pub max_skills_extract: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub skill_weight: f64,
    pub text_weight: f64,
    /// Carried for compatibility, not used by the scorer
    pub min_match_score: f64,
    /// Carried for compatibility, not used by the extractor
    pub skill_match_threshold: f64,
}

/// User additions to the built-in skill taxonomy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    /// Category name (e.g. "databases") to additional skills
    pub extra_skills: BTreeMap<String, Vec<String>>,
    /// Canonical skill to additional surface variants
    pub extra_synonyms: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Documents shorter than this (after trimming) are rejected
    pub min_text_length: usize,
    /// Extracted text is truncated to this many characters
    pub max_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_skill_confidence: 0.3,
            tfidf_max_features: 500,
            ngram_min: 1,
            ngram_max: 3,
            min_word_length: 2,
            max_word_length: 50,
            max_skills_extract: 50,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            skill_weight: 0.6,
            text_weight: 0.4,
            min_match_score: 0.0,
            skill_match_threshold: 0.85,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            min_text_length: 50,
            max_chars: 50_000,
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
    /// Load the configuration from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load and validate a configuration file at an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            ResumeFitError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeFitError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-fit")
            .join("config.toml")
    }

    /// Reject values the pipeline cannot honour
    pub fn validate(&self) -> Result<()> {
        let ex = &self.extraction;

        if ex.ngram_min == 0 || ex.ngram_min > ex.ngram_max || ex.ngram_max > 3 {
            return Err(invalid(format!(
                "n-gram range must satisfy 1 <= min <= max <= 3, got {}..={}",
                ex.ngram_min, ex.ngram_max
            )));
        }

        if ex.min_word_length == 0 || ex.min_word_length > ex.max_word_length {
            return Err(invalid(format!(
                "word length bounds are inverted or zero: [{}, {}]",
                ex.min_word_length, ex.max_word_length
            )));
        }

        if !(0.0..=1.0).contains(&ex.min_skill_confidence) {
            return Err(invalid(format!(
                "min_skill_confidence must be within [0, 1], got {}",
                ex.min_skill_confidence
            )));
        }

        if ex.tfidf_max_features == 0 || ex.max_skills_extract == 0 {
            return Err(invalid(
                "tfidf_max_features and max_skills_extract must be positive".to_string(),
            ));
        }

        let sc = &self.scoring;
        if sc.skill_weight < 0.0 || sc.text_weight < 0.0 {
            return Err(invalid("scoring weights must not be negative".to_string()));
        }
        if ((sc.skill_weight + sc.text_weight) - 1.0).abs() > 1e-6 {
            return Err(invalid(format!(
                "skill_weight + text_weight must equal 1.0, got {}",
                sc.skill_weight + sc.text_weight
            )));
        }

        for category in self.taxonomy.extra_skills.keys() {
            category.parse::<SkillCategory>().map_err(invalid)?;
        }

        if self.input.max_chars == 0 {
            return Err(invalid("input.max_chars must be positive".to_string()));
        }

        Ok(())
    }
}

fn invalid(message: String) -> ResumeFitError {
    ResumeFitError::Configuration(message)
}
