//! Blended resume/job fit scoring

use crate::config::{ExtractionConfig, ScoringConfig};
use crate::processing::term_weights::TermWeighter;
use crate::processing::text_processor::TextProcessor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub overall_score: f64,
    pub text_similarity_score: f64,
    pub skill_match_score: f64,
    pub matched_skills_count: usize,
    pub total_required_skills: usize,
    pub skill_coverage: f64,
    pub explanation: String,
}

pub struct MatchScorer {
    text_processor: TextProcessor,
    term_weighter: TermWeighter,
    skill_weight: f64,
    text_weight: f64,
}

impl MatchScorer {
    pub fn new(extraction: &ExtractionConfig, scoring: &ScoringConfig) -> Self {
        Self {
            text_processor: TextProcessor::from_config(extraction),
            term_weighter: TermWeighter::from_config(extraction),
            skill_weight: scoring.skill_weight,
            text_weight: scoring.text_weight,
        }
    }

    /// Score how well a resume fits a job from the raw texts and the skills
    /// already extracted from each
    pub fn score<R, J>(
        &self,
        resume_text: &str,
        job_text: &str,
        resume_skills: &[R],
        job_skills: &[J],
    ) -> MatchResult
    where
        R: AsRef<str>,
        J: AsRef<str>,
    {
        let text_similarity = self.text_similarity(resume_text, job_text);

        let resume_set = self.skill_set(resume_skills);
        let job_set = self.skill_set(job_skills);

        let matched = resume_set.intersection(&job_set).count();
        let total = job_set.len();
        let coverage = if total == 0 {
            0.0
        } else {
            matched as f64 / total as f64
        };

        let overall = self.skill_weight * coverage + self.text_weight * text_similarity;

        log::debug!(
            "Match scoring: text {:.3}, coverage {}/{}, overall {:.3}",
            text_similarity,
            matched,
            total,
            overall
        );

        MatchResult {
            overall_score: round2(overall * 100.0),
            text_similarity_score: round2(text_similarity * 100.0),
            skill_match_score: round2(coverage * 100.0),
            matched_skills_count: matched,
            total_required_skills: total,
            skill_coverage: round2(coverage * 100.0),
            explanation: explain(
                overall * 100.0,
                matched,
                total,
                coverage * 100.0,
                text_similarity * 100.0,
            ),
        }
    }

    /// Qualitative label for a 0-100 score
    pub fn match_level(score: f64) -> &'static str {
        if score >= 80.0 {
            "Excellent Match"
        } else if score >= 60.0 {
            "Good Match"
        } else if score >= 40.0 {
            "Moderate Match"
        } else if score >= 20.0 {
            "Low Match"
        } else {
            "Poor Match"
        }
    }

    /// Cosine similarity of the cleaned texts in [0, 1]
    fn text_similarity(&self, resume_text: &str, job_text: &str) -> f64 {
        if resume_text.is_empty() || job_text.is_empty() {
            return 0.0;
        }

        let resume = self.text_processor.clean(resume_text);
        let job = self.text_processor.clean(job_text);

        match self.term_weighter.pairwise_similarity(&resume, &job) {
            Some(similarity) => similarity,
            None => {
                log::warn!("Text similarity unavailable: no shared vocabulary could be built");
                0.0
            }
        }
    }

    fn skill_set<S: AsRef<str>>(&self, skills: &[S]) -> BTreeSet<String> {
        skills
            .iter()
            .map(|skill| self.text_processor.canonicalize(skill.as_ref()))
            .filter(|skill| !skill.is_empty())
            .collect()
    }
}

fn explain(overall: f64, matched: usize, total: usize, coverage: f64, text: f64) -> String {
    let band = if overall >= 80.0 {
        "Excellent"
    } else if overall >= 60.0 {
        "Good"
    } else if overall >= 40.0 {
        "Moderate"
    } else {
        "Low"
    };

    format!(
        "{} match ({:.1}%). You have {} out of {} required skills ({:.1}% coverage). \
         Overall content alignment is {:.1}%.",
        band, overall, matched, total, coverage, text
    )
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
