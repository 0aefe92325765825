//! Input manager for handling different file types

use crate::config::InputConfig;
use crate::error::{Result, ResumeFitError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use aho_corasick::AhoCorasick;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Keywords that usually appear somewhere in a resume
const RESUME_INDICATORS: &[&str] = &[
    "experience", "education", "skills", "work", "project", "university", "college", "degree",
    "bachelor", "master", "email", "phone", "linkedin",
];

const MIN_RESUME_INDICATORS: usize = 3;
const MIN_RESUME_WORDS: usize = 50;

/// Outcome of reading a document. Unreadable or near-empty documents are
/// reported here rather than as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub success: bool,
    pub text: String,
    pub char_count: usize,
    pub word_count: usize,
    pub method: Option<String>,
    pub error: Option<String>,
}

impl ParsedDocument {
    fn parsed(text: String, method: &str) -> Self {
        Self {
            success: true,
            char_count: text.chars().count(),
            word_count: text.split_whitespace().count(),
            text,
            method: Some(method.to_string()),
            error: None,
        }
    }

    fn failed(error: String, method: Option<&str>) -> Self {
        Self {
            success: false,
            text: String::new(),
            char_count: 0,
            word_count: 0,
            method: method.map(str::to_string),
            error: Some(error),
        }
    }

    /// Text of a successful parse, or the recorded failure as an error
    pub fn into_text(self) -> Result<String> {
        if self.success {
            Ok(self.text)
        } else {
            Err(ResumeFitError::InvalidInput(
                self.error.unwrap_or_else(|| "Document could not be parsed".to_string()),
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeValidation {
    pub is_valid: bool,
    pub indicators_found: usize,
    pub word_count: usize,
    pub suggestions: Vec<String>,
}

pub struct InputManager {
    config: InputConfig,
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
    indicator_matcher: AhoCorasick,
}

impl InputManager {
    pub fn new(config: InputConfig) -> Result<Self> {
        let indicator_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(RESUME_INDICATORS)
            .map_err(|e| {
                ResumeFitError::InvalidInput(format!("Failed to build resume indicator matcher: {}", e))
            })?;

        Ok(Self {
            config,
            cache: HashMap::new(),
            enable_cache: true,
            indicator_matcher,
        })
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Read a document into text, truncated to the configured character cap
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(path) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ResumeFitError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path)? {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(ResumeFitError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        let text = self.truncate(text);

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    /// Parse a document, reporting unreadable or too-short content as a failed result
    pub async fn parse(&mut self, path: &Path) -> ParsedDocument {
        let method = FileType::from_path(path).ok().map(|file_type| file_type.method());

        let text = match self.extract_text(path).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Could not parse {}: {}", path.display(), e);
                return ParsedDocument::failed(format!("Document parsing error: {}", e), method);
            }
        };

        if self.is_too_short(&text) {
            warn!("Too little text extracted from {}", path.display());
            return ParsedDocument::failed(
                format!("Could not extract meaningful text from {}", path.display()),
                method,
            );
        }

        ParsedDocument::parsed(text, method.unwrap_or("unknown"))
    }

    /// Wrap pasted text in the same structure as a parsed file
    pub fn parse_text(&self, text: &str) -> ParsedDocument {
        let method = FileType::Text.method();

        if self.is_too_short(text) {
            return ParsedDocument::failed("Text is too short or empty".to_string(), Some(method));
        }

        ParsedDocument::parsed(self.truncate(text.to_string()), method)
    }

    /// Check that text looks like a resume: enough indicator keywords and words
    pub fn validate_resume(&self, text: &str) -> ResumeValidation {
        let indicators: HashSet<usize> = self
            .indicator_matcher
            .find_overlapping_iter(text)
            .map(|mat| mat.pattern().as_usize())
            .collect();

        let indicators_found = indicators.len();
        let word_count = text.split_whitespace().count();
        let is_valid = indicators_found >= MIN_RESUME_INDICATORS && word_count >= MIN_RESUME_WORDS;

        let suggestions = if is_valid {
            Vec::new()
        } else {
            vec![
                "Make sure the document contains actual resume content".to_string(),
                "Check that the file is not password protected or corrupted".to_string(),
                "Ensure the resume has standard sections (Experience, Education, Skills)"
                    .to_string(),
            ]
        };

        ResumeValidation {
            is_valid,
            indicators_found,
            word_count,
            suggestions,
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    fn is_too_short(&self, text: &str) -> bool {
        text.trim().chars().count() < self.config.min_text_length
    }

    fn truncate(&self, text: String) -> String {
        match text.char_indices().nth(self.config.max_chars) {
            Some((byte_index, _)) => {
                warn!(
                    "Document truncated to {} characters",
                    self.config.max_chars
                );
                text[..byte_index].to_string()
            }
            None => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> InputManager {
        InputManager::new(InputConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_text_rejects_short_input() {
        let parsed = manager().parse_text("   too short   ");

        assert!(!parsed.success);
        assert_eq!(parsed.error.as_deref(), Some("Text is too short or empty"));
        assert_eq!(parsed.method.as_deref(), Some("plain_text"));
        assert!(parsed.clone().into_text().is_err());
    }

    #[test]
    fn test_parse_text_counts() {
        let text = "Rust engineer with experience in distributed systems and compilers.";
        let parsed = manager().parse_text(text);

        assert!(parsed.success);
        assert_eq!(parsed.char_count, text.chars().count());
        assert_eq!(parsed.word_count, 9);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let config = InputConfig {
            min_text_length: 1,
            max_chars: 4,
        };
        let manager = InputManager::new(config).unwrap();

        let parsed = manager.parse_text("résumé text");
        assert_eq!(parsed.text, "résu");
        assert_eq!(parsed.char_count, 4);
    }

    #[test]
    fn test_validate_resume() {
        let manager = manager();

        let mut resume = String::from(
            "EXPERIENCE at Acme. EDUCATION: Bachelor of Science, State University. Skills: Rust.",
        );
        resume.push_str(&" filler".repeat(50));

        let validation = manager.validate_resume(&resume);
        assert!(validation.is_valid);
        assert_eq!(validation.indicators_found, 5);
        assert!(validation.suggestions.is_empty());

        let recipe = manager.validate_resume("Mix flour and water, then bake for an hour.");
        assert!(!recipe.is_valid);
        assert_eq!(recipe.indicators_found, 0);
        assert_eq!(recipe.suggestions.len(), 3);
    }

    #[tokio::test]
    async fn test_parse_reports_failures_without_erroring() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = manager();

        let docx = dir.path().join("resume.docx");
        std::fs::write(&docx, "binary").unwrap();
        let parsed = manager.parse(&docx).await;
        assert!(!parsed.success);
        assert!(parsed.error.unwrap().contains("Unsupported file type"));

        let short = dir.path().join("short.txt");
        std::fs::write(&short, "Rust").unwrap();
        let parsed = manager.parse(&short).await;
        assert!(!parsed.success);
        assert_eq!(parsed.method.as_deref(), Some("plain_text"));
    }

    #[tokio::test]
    async fn test_extract_text_uses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.md");
        std::fs::write(&path, "# Resume\n\nSenior Rust engineer").unwrap();

        let mut manager = manager();
        let first = manager.extract_text(&path).await.unwrap();
        assert_eq!(manager.cache_size(), 1);

        std::fs::write(&path, "# Changed").unwrap();
        let second = manager.extract_text(&path).await.unwrap();
        assert_eq!(first, second);

        manager.clear_cache();
        assert_eq!(manager.extract_text(&path).await.unwrap(), "Changed");
    }
}
