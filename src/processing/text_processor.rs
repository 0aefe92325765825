//! Text cleaning, n-gram generation and skill term canonicalization

use crate::config::ExtractionConfig;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Proficiency adjectives stripped from either end of a skill term
const PROFICIENCY_WORDS: &str = "expert|proficient|advanced|intermediate|beginner";

#[derive(Debug, Clone)]
pub struct TextProcessor {
    min_word_length: usize,
    max_word_length: usize,
    url_regex: Regex,
    email_regex: Regex,
    long_number_regex: Regex,
    whitespace_regex: Regex,
    disallowed_regex: Regex,
    version_regex: Regex,
    leading_proficiency_regex: Regex,
    trailing_proficiency_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let defaults = ExtractionConfig::default();
        Self::with_word_length(defaults.min_word_length, defaults.max_word_length)
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::with_word_length(config.min_word_length, config.max_word_length)
    }

    pub fn with_word_length(min_word_length: usize, max_word_length: usize) -> Self {
        let url_regex = Regex::new(r"https?://\S+").expect("Invalid URL regex");

        let email_regex = Regex::new(r"\S+@\S+").expect("Invalid email regex");

        let long_number_regex = Regex::new(r"\d{10,}").expect("Invalid long number regex");

        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");

        let disallowed_regex =
            Regex::new(r"[^a-z0-9\s.+#-]").expect("Invalid character filter regex");

        let version_regex = Regex::new(r"\s+\d+(?:\.\d+)*$").expect("Invalid version regex");

        let leading_proficiency_regex = Regex::new(&format!(r"^(?:{})\s+", PROFICIENCY_WORDS))
            .expect("Invalid leading proficiency regex");

        let trailing_proficiency_regex = Regex::new(&format!(r"\s+(?:{})$", PROFICIENCY_WORDS))
            .expect("Invalid trailing proficiency regex");

        Self {
            min_word_length,
            max_word_length,
            url_regex,
            email_regex,
            long_number_regex,
            whitespace_regex,
            disallowed_regex,
            version_regex,
            leading_proficiency_regex,
            trailing_proficiency_regex,
        }
    }

    /// Clean and normalize raw text for skill matching.
    ///
    /// Lowercases, drops URLs, email addresses and long digit runs, and keeps
    /// only `[a-z0-9 .+#-]` so tokens like "c++", "c#" and "node.js" survive.
    pub fn clean(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let mut cleaned = text.to_lowercase();

        cleaned = self.url_regex.replace_all(&cleaned, "").into_owned();
        cleaned = self.email_regex.replace_all(&cleaned, "").into_owned();
        cleaned = self.long_number_regex.replace_all(&cleaned, "").into_owned();

        cleaned = self.normalize_whitespace(&cleaned);
        cleaned = self.disallowed_regex.replace_all(&cleaned, " ").into_owned();

        self.normalize_whitespace(&cleaned)
    }

    /// All contiguous word spans of length 1..=max_n, shortest spans first
    pub fn ngrams(&self, text: &str, max_n: usize) -> Vec<String> {
        let words: Vec<&str> = self.words(text).collect();
        let mut ngrams = Vec::with_capacity(words.len() * max_n);

        for n in 1..=max_n {
            for window in words.windows(n) {
                let ngram = window.join(" ");
                if self.is_valid_ngram(&ngram) {
                    ngrams.push(ngram);
                }
            }
        }

        ngrams
    }

    /// Clean, then split into valid single-word tokens
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned = self.clean(text);
        self.words(&cleaned)
            .filter(|token| self.is_valid_ngram(token))
            .map(str::to_string)
            .collect()
    }

    /// Split text into sentences
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Canonical form of a skill term: "Expert Python 3" becomes "python".
    ///
    /// Stripping repeats until nothing changes, so the result is a fixed point.
    pub fn canonicalize(&self, term: &str) -> String {
        let mut current = self.normalize_whitespace(&term.to_lowercase());

        loop {
            let stripped = self.strip_qualifiers(&current);
            if stripped == current {
                return current;
            }
            current = stripped;
        }
    }

    fn strip_qualifiers(&self, term: &str) -> String {
        let term = self.version_regex.replace(term, "");
        let term = self.leading_proficiency_regex.replace(&term, "");
        let term = self.trailing_proficiency_regex.replace(&term, "");
        term.trim().to_string()
    }

    /// Whitespace-separated words with sentence punctuation trimmed from the edges
    fn words<'a>(&self, text: &'a str) -> impl Iterator<Item = &'a str> {
        text.split_whitespace()
            .map(|word| word.trim_matches(|c: char| c == '.' || c == '-'))
            .filter(|word| !word.is_empty())
    }

    fn is_valid_ngram(&self, ngram: &str) -> bool {
        let trimmed = ngram.trim();
        if trimmed.is_empty() {
            return false;
        }

        let length = ngram.chars().count();
        if length < self.min_word_length || length > self.max_word_length {
            return false;
        }

        !ngram.chars().all(char::is_numeric)
    }

    fn normalize_whitespace(&self, text: &str) -> String {
        self.whitespace_regex.replace_all(text, " ").trim().to_string()
    }
}
