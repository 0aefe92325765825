//! Analysis engine wiring extraction, scoring and gap analysis together

use crate::config::Config;
use crate::error::Result;
use crate::processing::gap_analyzer::{GapAnalyzer, GapResult};
use crate::processing::matcher::{MatchResult, MatchScorer};
use crate::processing::skill_extractor::{ExtractedSkill, SkillExtractor};
use crate::processing::taxonomy::SkillTaxonomy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Coordinates all analysis components for one configuration
pub struct AnalysisEngine {
    taxonomy: Arc<SkillTaxonomy>,
    extractor: SkillExtractor,
    scorer: MatchScorer,
    gap_analyzer: GapAnalyzer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub match_result: MatchResult,
    pub gap_result: GapResult,

    /// Skills found in each document, ranked by confidence
    pub resume_skills: Vec<ExtractedSkill>,
    pub job_skills: Vec<ExtractedSkill>,

    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisEngineStats {
    pub taxonomy_skills: usize,
    pub max_skills_extract: usize,
    pub skill_weight: f64,
    pub text_weight: f64,
}

impl AnalysisEngine {
    /// Build the engine, extending the built-in taxonomy with any configured additions
    pub fn new(config: &Config) -> Result<Self> {
        let taxonomy = if config.taxonomy.extra_skills.is_empty()
            && config.taxonomy.extra_synonyms.is_empty()
        {
            SkillTaxonomy::builtin()
        } else {
            log::info!(
                "Extending skill taxonomy with {} categories and {} synonym groups from config",
                config.taxonomy.extra_skills.len(),
                config.taxonomy.extra_synonyms.len()
            );
            Arc::new(SkillTaxonomy::from_config(&config.taxonomy)?)
        };

        Ok(Self::with_taxonomy(config, taxonomy))
    }

    pub fn with_taxonomy(config: &Config, taxonomy: Arc<SkillTaxonomy>) -> Self {
        Self {
            extractor: SkillExtractor::new(Arc::clone(&taxonomy), &config.extraction),
            scorer: MatchScorer::new(&config.extraction, &config.scoring),
            gap_analyzer: GapAnalyzer::new(Arc::clone(&taxonomy)),
            taxonomy,
        }
    }

    /// Run the full pipeline over a resume and a job description
    pub fn analyze(&self, resume_text: &str, job_text: &str) -> AlignmentReport {
        let start_time = Instant::now();

        let resume_skills = self.extractor.extract(resume_text);
        let job_skills = self.extractor.extract(job_text);
        log::info!(
            "Extracted {} resume skills and {} job skills",
            resume_skills.len(),
            job_skills.len()
        );

        let resume_names: Vec<&str> = resume_skills.iter().map(|s| s.skill.as_str()).collect();
        let job_names: Vec<&str> = job_skills.iter().map(|s| s.skill.as_str()).collect();

        let match_result = self
            .scorer
            .score(resume_text, job_text, &resume_names, &job_names);
        let gap_result = self.gap_analyzer.analyze(&resume_names, &job_names);

        let processing_time = start_time.elapsed();
        log::info!(
            "Analysis complete: {:.1}% overall in {}ms",
            match_result.overall_score,
            processing_time.as_millis()
        );

        AlignmentReport {
            match_result,
            gap_result,
            resume_skills,
            job_skills,
            processing_time_ms: processing_time.as_millis() as u64,
        }
    }

    pub fn extract_skills(&self, text: &str) -> Vec<ExtractedSkill> {
        self.extractor.extract(text)
    }

    pub fn score(
        &self,
        resume_text: &str,
        job_text: &str,
        resume_skills: &[String],
        job_skills: &[String],
    ) -> MatchResult {
        self.scorer.score(resume_text, job_text, resume_skills, job_skills)
    }

    pub fn analyze_gap(&self, resume_skills: &[String], job_skills: &[String]) -> GapResult {
        self.gap_analyzer.analyze(resume_skills, job_skills)
    }

    pub fn taxonomy(&self) -> &Arc<SkillTaxonomy> {
        &self.taxonomy
    }

    pub fn get_stats(&self, config: &Config) -> AnalysisEngineStats {
        AnalysisEngineStats {
            taxonomy_skills: self.taxonomy.skill_count(),
            max_skills_extract: config.extraction.max_skills_extract,
            skill_weight: config.scoring.skill_weight,
            text_weight: config.scoring.text_weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::taxonomy::SkillCategory;

    const RESUME: &str = "Software engineer with five years of Python and Django. \
        Built REST APIs backed by PostgreSQL and Redis, deployed with Docker on AWS. \
        Comfortable with Git, Linux and agile teams.";

    const JOB: &str = "We are hiring a backend engineer. Requirements: Python, Django, \
        PostgreSQL, Docker, Kubernetes and Terraform. Experience with AWS is a plus.";

    #[test]
    fn test_engine_pipeline() {
        let engine = AnalysisEngine::new(&Config::default()).unwrap();
        let report = engine.analyze(RESUME, JOB);

        let job_names: Vec<&str> = report.job_skills.iter().map(|s| s.skill.as_str()).collect();
        assert!(job_names.contains(&"kubernetes"));
        assert!(job_names.contains(&"terraform"));

        assert!(report.gap_result.matched_skills.skills.contains(&"python".to_string()));
        assert!(report.gap_result.missing_skills.skills.contains(&"kubernetes".to_string()));
        assert!(report.gap_result.extra_skills.skills.contains(&"redis".to_string()));

        let result = &report.match_result;
        assert!(result.overall_score > 0.0 && result.overall_score <= 100.0);
        assert_eq!(
            result.total_required_skills,
            report.gap_result.matched_skills.count + report.gap_result.missing_skills.count
        );
        assert_eq!(result.matched_skills_count, report.gap_result.matched_skills.count);
    }

    #[test]
    fn test_engine_empty_inputs() {
        let engine = AnalysisEngine::new(&Config::default()).unwrap();
        let report = engine.analyze("", "");

        assert!(report.resume_skills.is_empty());
        assert!(report.job_skills.is_empty());
        assert_eq!(report.match_result.overall_score, 0.0);
        assert_eq!(
            report.gap_result.summary,
            "No specific skills were identified in the job description."
        );
    }

    #[test]
    fn test_engine_uses_configured_taxonomy() {
        let mut config = Config::default();
        config
            .taxonomy
            .extra_skills
            .insert("databases".to_string(), vec!["clickhouse".to_string()]);

        let engine = AnalysisEngine::new(&config).unwrap();
        let skills = engine.extract_skills("Tuned ClickHouse queries and ClickHouse schemas.");

        let clickhouse = skills.iter().find(|s| s.skill == "clickhouse").unwrap();
        assert_eq!(clickhouse.category, SkillCategory::Databases);
        assert!(engine.get_stats(&config).taxonomy_skills > SkillTaxonomy::builtin().skill_count());
    }

    #[test]
    fn test_engine_rejects_conflicting_taxonomy() {
        let mut config = Config::default();
        config
            .taxonomy
            .extra_skills
            .insert("databases".to_string(), vec!["python".to_string()]);

        assert!(AnalysisEngine::new(&config).is_err());
    }
}
