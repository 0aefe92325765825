//! Report structures combining match scoring and gap analysis

use crate::processing::analyzer::AlignmentReport;
use crate::processing::gap_analyzer::GapResult;
use crate::processing::matcher::MatchResult;
use crate::processing::skill_extractor::ExtractedSkill;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a formatter needs to render one analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub match_result: MatchResult,
    pub gap_result: GapResult,

    /// Ranked skills extracted from each document
    pub resume_skills: Vec<ExtractedSkill>,
    pub job_skills: Vec<ExtractedSkill>,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    /// Version of the tool that produced the report
    pub tool_version: String,

    /// Resume file analyzed
    pub resume_file: String,

    /// Job description file analyzed
    pub job_file: String,

    pub processing_time_ms: u64,
}

impl AnalysisReport {
    pub fn from_alignment(alignment: AlignmentReport, resume_file: &str, job_file: &str) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                resume_file: resume_file.to_string(),
                job_file: job_file.to_string(),
                processing_time_ms: alignment.processing_time_ms,
            },
            match_result: alignment.match_result,
            gap_result: alignment.gap_result,
            resume_skills: alignment.resume_skills,
            job_skills: alignment.job_skills,
        }
    }

    /// Highest-confidence skills of a document, at most `limit`
    pub fn top_skills(skills: &[ExtractedSkill], limit: usize) -> &[ExtractedSkill] {
        &skills[..skills.len().min(limit)]
    }
}
