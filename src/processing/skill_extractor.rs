//! Skill extraction combining taxonomy lookups with term importance scoring

use crate::config::ExtractionConfig;
use crate::processing::taxonomy::{SkillCategory, SkillTaxonomy};
use crate::processing::term_weights::TermWeighter;
use crate::processing::text_processor::TextProcessor;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Confidence added per taxonomy hit
const TAXONOMY_HIT_CONFIDENCE: f64 = 0.3;
/// N-gram size used for the taxonomy pass
const TAXONOMY_NGRAM_SIZE: usize = 3;

const TAXONOMY_WEIGHT: f64 = 0.7;
const TFIDF_BOOST_WEIGHT: f64 = 0.3;
const TFIDF_ONLY_WEIGHT: f64 = 0.5;

/// Frequent words in resumes and job ads that are not skills
const NOISE_WORDS: &[&str] = &[
    "experience", "work", "team", "project", "company", "role", "position", "job", "year",
    "month", "day", "time", "good", "great", "excellent", "strong", "ability", "skill",
    "knowledge",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillSource {
    Taxonomy,
    Tfidf,
    Both,
}

impl SkillSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillSource::Taxonomy => "taxonomy",
            SkillSource::Tfidf => "tfidf",
            SkillSource::Both => "both",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSkill {
    pub skill: String,
    pub confidence: f64,
    pub category: SkillCategory,
    pub source: SkillSource,
}

pub struct SkillExtractor {
    taxonomy: Arc<SkillTaxonomy>,
    text_processor: TextProcessor,
    term_weighter: TermWeighter,
    min_confidence: f64,
    max_skills: usize,
    noise_words: HashSet<&'static str>,
}

impl SkillExtractor {
    pub fn new(taxonomy: Arc<SkillTaxonomy>, config: &ExtractionConfig) -> Self {
        Self {
            taxonomy,
            text_processor: TextProcessor::from_config(config),
            term_weighter: TermWeighter::from_config(config),
            min_confidence: config.min_skill_confidence,
            max_skills: config.max_skills_extract,
            noise_words: NOISE_WORDS.iter().copied().collect(),
        }
    }

    /// Extract skills ranked by confidence, highest first
    pub fn extract(&self, text: &str) -> Vec<ExtractedSkill> {
        let cleaned = self.text_processor.clean(text);
        if cleaned.is_empty() {
            return Vec::new();
        }

        let taxonomy_scores = self.taxonomy_pass(&cleaned);
        let tfidf_scores = self.statistical_pass(&cleaned);

        log::debug!(
            "Skill extraction: {} taxonomy hits, {} weighted terms",
            taxonomy_scores.len(),
            tfidf_scores.len()
        );

        let mut skills = self.merge(taxonomy_scores, tfidf_scores);

        skills.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| a.skill.cmp(&b.skill))
        });
        skills.truncate(self.max_skills);

        skills
    }

    /// Skill names only, in ranked order
    pub fn extract_skill_list(&self, text: &str) -> Vec<String> {
        self.extract(text).into_iter().map(|s| s.skill).collect()
    }

    /// Accumulate confidence for every n-gram that resolves to a known skill
    fn taxonomy_pass(&self, cleaned: &str) -> BTreeMap<String, f64> {
        let mut found: BTreeMap<String, f64> = BTreeMap::new();

        for ngram in self.text_processor.ngrams(cleaned, TAXONOMY_NGRAM_SIZE) {
            let normalized = self.text_processor.canonicalize(&ngram);

            if self.taxonomy.is_known_skill(&normalized) {
                let canonical = self.taxonomy.canonical_form(&normalized);
                *found.entry(canonical).or_insert(0.0) += TAXONOMY_HIT_CONFIDENCE;
            }
        }

        for confidence in found.values_mut() {
            *confidence = confidence.min(1.0);
        }

        found
    }

    /// Important terms of the text that look like skills
    fn statistical_pass(&self, cleaned: &str) -> BTreeMap<String, f64> {
        let weights = self.term_weighter.term_frequencies(cleaned);
        if weights.is_empty() {
            log::debug!("No term vocabulary; extraction continues with taxonomy hits only");
            return BTreeMap::new();
        }

        let mut terms: BTreeMap<String, f64> = BTreeMap::new();

        for (term, weight) in weights {
            if weight < self.min_confidence {
                continue;
            }

            let normalized = self.text_processor.canonicalize(&term);
            if !self.is_likely_skill(&normalized) {
                continue;
            }

            let canonical = self.taxonomy.canonical_form(&normalized);
            let entry = terms.entry(canonical).or_insert(weight);
            *entry = entry.max(weight);
        }

        terms
    }

    fn is_likely_skill(&self, term: &str) -> bool {
        if self.taxonomy.is_known_skill(term) {
            return true;
        }

        let length = term.chars().count();
        if !(2..=30).contains(&length) {
            return false;
        }

        if !term.chars().any(char::is_alphabetic) {
            return false;
        }

        !self.noise_words.contains(term)
    }

    fn merge(
        &self,
        taxonomy_scores: BTreeMap<String, f64>,
        tfidf_scores: BTreeMap<String, f64>,
    ) -> Vec<ExtractedSkill> {
        let mut merged: BTreeMap<String, (f64, SkillSource)> = taxonomy_scores
            .into_iter()
            .map(|(skill, score)| (skill, (score * TAXONOMY_WEIGHT, SkillSource::Taxonomy)))
            .collect();

        for (skill, score) in tfidf_scores {
            match merged.get_mut(&skill) {
                Some((confidence, source)) => {
                    *confidence = (*confidence + score * TFIDF_BOOST_WEIGHT).min(1.0);
                    *source = SkillSource::Both;
                }
                None => {
                    merged.insert(skill, (score * TFIDF_ONLY_WEIGHT, SkillSource::Tfidf));
                }
            }
        }

        merged
            .into_iter()
            .map(|(skill, (confidence, source))| ExtractedSkill {
                category: self.taxonomy.category_of(&skill),
                skill,
                confidence,
                source,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> SkillExtractor {
        SkillExtractor::new(SkillTaxonomy::builtin(), &ExtractionConfig::default())
    }

    #[test]
    fn test_extracts_taxonomy_skills_with_categories() {
        let skills = extractor().extract(
            "Senior engineer with Python, Docker and Kubernetes. Built REST services in Django.",
        );

        let find = |name: &str| skills.iter().find(|s| s.skill == name);

        let python = find("python").expect("python extracted");
        assert_eq!(python.category, SkillCategory::ProgrammingLanguages);
        assert!(matches!(python.source, SkillSource::Taxonomy | SkillSource::Both));

        assert_eq!(find("docker").unwrap().category, SkillCategory::CloudDevops);
        assert_eq!(find("django").unwrap().category, SkillCategory::WebBackend);
        assert!(find("kubernetes").is_some());
    }

    #[test]
    fn test_synonyms_resolve_to_canonical_skill() {
        let skills = extractor().extract_skill_list("Deployed k8s clusters and wrote JS tooling.");

        assert!(skills.contains(&"kubernetes".to_string()));
        assert!(skills.contains(&"javascript".to_string()));
        assert!(!skills.contains(&"k8s".to_string()));
    }

    #[test]
    fn test_repeated_mentions_raise_confidence() {
        let extractor = extractor();
        let once = extractor.extract("We use rust for backend services and tooling.");
        let many = extractor.extract("Rust. Rust services. Rust tooling. Rust everywhere.");

        let confidence = |skills: &[ExtractedSkill]| {
            skills.iter().find(|s| s.skill == "rust").map(|s| s.confidence).unwrap()
        };
        assert!(confidence(&many) > confidence(&once));
    }

    #[test]
    fn test_confidence_bounds_and_ordering() {
        let text = "Python python python python python SQL sql sql AWS aws Terraform \
                    pandas numpy machine learning machine learning deep learning";
        let skills = extractor().extract(text);

        assert!(!skills.is_empty());
        for skill in &skills {
            assert!((0.0..=1.0).contains(&skill.confidence), "{:?}", skill);
        }
        for pair in skills.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn test_noise_words_are_not_skills() {
        let skills = extractor().extract_skill_list("experience experience experience experience");
        assert!(!skills.contains(&"experience".to_string()));
    }

    #[test]
    fn test_statistical_terms_are_tagged() {
        let skills = extractor().extract("Airflow airflow airflow pipelines");
        let airflow = skills.iter().find(|s| s.skill == "airflow").expect("airflow extracted");

        assert_eq!(airflow.source, SkillSource::Tfidf);
        assert_eq!(airflow.category, SkillCategory::Other);
    }

    fn find<'a>(skills: &'a [ExtractedSkill], name: &str) -> &'a ExtractedSkill {
        skills
            .iter()
            .find(|s| s.skill == name)
            .unwrap_or_else(|| panic!("{} not extracted from {:?}", name, skills))
    }

    #[test]
    fn test_single_term_blends_taxonomy_and_term_weight() {
        // 0.7 * 0.3 taxonomy hit + 0.3 * 1.0 term weight
        let skills = extractor().extract("rust");
        let rust = find(&skills, "rust");

        assert!((rust.confidence - 0.51).abs() < 1e-9, "{:?}", rust);
        assert_eq!(rust.source, SkillSource::Both);
    }

    #[test]
    fn test_falls_back_to_taxonomy_without_vocabulary() {
        // Single letter tokens leave no term vocabulary
        let skills = extractor().extract("c++ c#");

        assert_eq!(skills.len(), 2);
        for name in ["c++", "c#"] {
            let skill = find(&skills, name);
            assert!((skill.confidence - 0.21).abs() < 1e-9, "{:?}", skill);
            assert_eq!(skill.source, SkillSource::Taxonomy);
        }
    }

    #[test]
    fn test_taxonomy_hits_are_clamped() {
        let extractor = extractor();
        let text = "python ".repeat(5);

        let hits = extractor.taxonomy_pass(&extractor.text_processor.clean(&text));
        assert_eq!(hits.get("python"), Some(&1.0));

        let skills = extractor.extract(&text);
        let python = find(&skills, "python");
        assert!(python.confidence > 0.7 && python.confidence <= 1.0, "{:?}", python);
        assert_eq!(python.source, SkillSource::Both);
    }

    #[test]
    fn test_statistical_synonyms_merge_into_canonical() {
        let skills = extractor().extract("k8s k8s k8s");

        let kubernetes = find(&skills, "kubernetes");
        assert_eq!(kubernetes.source, SkillSource::Both);
        assert!(skills.iter().all(|s| s.skill != "k8s"));
    }

    #[test]
    fn test_cap_and_empty_input() {
        let mut config = ExtractionConfig::default();
        config.max_skills_extract = 2;
        let extractor = SkillExtractor::new(SkillTaxonomy::builtin(), &config);

        let skills = extractor.extract("python java rust go scala kotlin swift");
        assert_eq!(skills.len(), 2);

        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("   ").is_empty());
    }
}
