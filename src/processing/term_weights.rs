//! Term importance statistics over n-gram vocabularies
//!
//! Single texts are weighted by L2-normalized term frequency. Pairs of texts
//! share a smoothed TF-IDF vocabulary and are compared by cosine similarity.

use crate::config::ExtractionConfig;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Common English function words excluded from term statistics
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
    "during", "each", "etc", "few", "for", "from", "further", "had", "has", "have",
    "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i",
    "if", "in", "into", "is", "it", "its", "itself", "just", "may", "me", "more", "most",
    "must", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "per", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "within", "without", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

#[derive(Debug, Clone)]
pub struct TermWeighter {
    ngram_min: usize,
    ngram_max: usize,
    max_features: usize,
    token_regex: Regex,
    stop_words: HashSet<&'static str>,
}

impl Default for TermWeighter {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

impl TermWeighter {
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.ngram_min, config.ngram_max, config.tfidf_max_features)
    }

    pub fn new(ngram_min: usize, ngram_max: usize, max_features: usize) -> Self {
        let token_regex = Regex::new(r"\b\w\w+\b").expect("Invalid token regex");

        Self {
            ngram_min: ngram_min.max(1),
            ngram_max: ngram_max.max(ngram_min.max(1)),
            max_features,
            token_regex,
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Stop-word filtered n-gram terms of a text, in document order
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = self
            .token_regex
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(token))
            .collect();

        let mut terms = Vec::new();
        for n in self.ngram_min..=self.ngram_max {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// L2-normalized term frequencies for a single text.
    ///
    /// Empty when the text has no usable vocabulary.
    pub fn term_frequencies(&self, text: &str) -> BTreeMap<String, f64> {
        let counts = count_terms(self.analyze(text));
        let vocabulary = self.select_vocabulary(&counts);

        let weights: BTreeMap<String, f64> = vocabulary
            .into_iter()
            .map(|term| {
                let count = counts.get(&term).copied().unwrap_or(0) as f64;
                (term, count)
            })
            .collect();

        normalize(weights)
    }

    /// Cosine similarity of two texts over their shared smoothed TF-IDF space.
    ///
    /// `None` when the pair has no usable vocabulary.
    pub fn pairwise_similarity(&self, first: &str, second: &str) -> Option<f64> {
        let first_counts = count_terms(self.analyze(first));
        let second_counts = count_terms(self.analyze(second));

        let mut corpus_counts = first_counts.clone();
        for (term, count) in &second_counts {
            *corpus_counts.entry(term.clone()).or_insert(0) += count;
        }

        let vocabulary = self.select_vocabulary(&corpus_counts);
        if vocabulary.is_empty() {
            return None;
        }

        let documents = 2.0_f64;
        let idf: HashMap<&str, f64> = vocabulary
            .iter()
            .map(|term| {
                let df = [&first_counts, &second_counts]
                    .iter()
                    .filter(|counts| counts.contains_key(term))
                    .count() as f64;
                (term.as_str(), ((1.0 + documents) / (1.0 + df)).ln() + 1.0)
            })
            .collect();

        let vectorize = |counts: &HashMap<String, usize>| -> BTreeMap<String, f64> {
            let weights = vocabulary
                .iter()
                .map(|term| {
                    let tf = counts.get(term).copied().unwrap_or(0) as f64;
                    (term.clone(), tf * idf[term.as_str()])
                })
                .collect();
            normalize(weights)
        };

        let first_vector = vectorize(&first_counts);
        let second_vector = vectorize(&second_counts);
        if first_vector.is_empty() || second_vector.is_empty() {
            return None;
        }

        let dot: f64 = first_vector
            .iter()
            .filter_map(|(term, a)| second_vector.get(term).map(|b| a * b))
            .sum();

        Some(dot.clamp(0.0, 1.0))
    }

    /// Most frequent terms up to the feature cap, ties broken alphabetically
    fn select_vocabulary(&self, counts: &HashMap<String, usize>) -> Vec<String> {
        let mut ranked: Vec<(&String, usize)> = counts.iter().map(|(t, c)| (t, *c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
            .into_iter()
            .take(self.max_features)
            .map(|(term, _)| term.clone())
            .collect()
    }
}

fn count_terms(terms: Vec<String>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for term in terms {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

/// Scale to unit length; a zero vector yields an empty map
fn normalize(weights: BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm == 0.0 {
        return BTreeMap::new();
    }

    weights
        .into_iter()
        .filter(|(_, w)| *w > 0.0)
        .map(|(term, w)| (term, w / norm))
        .collect()
}
