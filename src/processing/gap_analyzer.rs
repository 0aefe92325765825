//! Skill gap analysis between a resume and a job description

use crate::processing::taxonomy::{SkillCategory, SkillTaxonomy};
use crate::processing::text_processor::TextProcessor;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Categories recommended first, most important first
const PRIORITY_CATEGORIES: [SkillCategory; 6] = [
    SkillCategory::ProgrammingLanguages,
    SkillCategory::MlAi,
    SkillCategory::WebFrontend,
    SkillCategory::WebBackend,
    SkillCategory::Databases,
    SkillCategory::CloudDevops,
];

const MAX_RECOMMENDATIONS: usize = 5;
const PRIORITY_SKILLS_PER_RECOMMENDATION: usize = 5;
const OTHER_SKILLS_PER_RECOMMENDATION: usize = 3;
const NAMED_MISSING_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub skills: Vec<String>,
    pub count: usize,
    pub by_category: BTreeMap<SkillCategory, Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub skills: Vec<String>,
    pub priority: Priority,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapResult {
    pub matched_skills: SkillGroup,
    pub missing_skills: SkillGroup,
    pub extra_skills: SkillGroup,
    pub insights: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub summary: String,
}

pub struct GapAnalyzer {
    taxonomy: Arc<SkillTaxonomy>,
    text_processor: TextProcessor,
}

impl GapAnalyzer {
    pub fn new(taxonomy: Arc<SkillTaxonomy>) -> Self {
        Self {
            taxonomy,
            text_processor: TextProcessor::new(),
        }
    }

    /// Compare resume skills against job skills
    pub fn analyze<R, J>(&self, resume_skills: &[R], job_skills: &[J]) -> GapResult
    where
        R: AsRef<str>,
        J: AsRef<str>,
    {
        let resume = self.skill_set(resume_skills);
        let job = self.skill_set(job_skills);

        let matched: BTreeSet<String> = resume.intersection(&job).cloned().collect();
        let missing: BTreeSet<String> = job.difference(&resume).cloned().collect();
        let extra: BTreeSet<String> = resume.difference(&job).cloned().collect();

        log::debug!(
            "Gap analysis: {} matched, {} missing, {} extra",
            matched.len(),
            missing.len(),
            extra.len()
        );

        let matched_skills = self.group(&matched);
        let missing_skills = self.group(&missing);
        let extra_skills = self.group(&extra);

        let insights = self.insights(&matched_skills, &missing_skills, &extra_skills, job.len());
        let recommendations =
            recommendations(&missing_skills.by_category, &matched_skills.by_category);
        let summary = summary(matched.len(), missing.len(), job.len());

        GapResult {
            matched_skills,
            missing_skills,
            extra_skills,
            insights,
            recommendations,
            summary,
        }
    }

    fn skill_set<S: AsRef<str>>(&self, skills: &[S]) -> BTreeSet<String> {
        skills
            .iter()
            .map(|skill| self.text_processor.canonicalize(skill.as_ref()))
            .filter(|skill| !skill.is_empty())
            .collect()
    }

    fn group(&self, skills: &BTreeSet<String>) -> SkillGroup {
        let skills: Vec<String> = skills.iter().cloned().collect();

        SkillGroup {
            count: skills.len(),
            by_category: self.taxonomy.categorize(&skills),
            skills,
        }
    }

    fn insights(
        &self,
        matched: &SkillGroup,
        missing: &SkillGroup,
        extra: &SkillGroup,
        required: usize,
    ) -> Vec<String> {
        let mut insights = Vec::new();

        if required > 0 {
            let rate = matched.count as f64 / required as f64 * 100.0;
            insights.push(format!(
                "You match {:.1}% of the required skills for this position.",
                rate
            ));
        }

        if missing.count == 0 {
            insights
                .push("Excellent! You have all the required skills for this position.".to_string());
        } else if missing.count <= NAMED_MISSING_LIMIT {
            insights.push(format!(
                "You're missing {} key skill(s): {}.",
                missing.count,
                missing.skills.join(", ")
            ));
        } else {
            insights.push(format!(
                "You're missing {} skills. Focus on the most critical ones first.",
                missing.count
            ));
        }

        if extra.count > 0 {
            insights.push(format!(
                "You have {} additional skill(s) that could differentiate you from other candidates.",
                extra.count
            ));
        }

        if let Some(category) = strongest_category(&matched.by_category) {
            insights.push(format!(
                "Your strongest alignment is in {} skills.",
                category.label()
            ));
        }

        insights
    }
}

/// Category with the most matched skills; the first one in category order wins ties
fn strongest_category(by_category: &BTreeMap<SkillCategory, Vec<String>>) -> Option<SkillCategory> {
    let mut strongest: Option<(SkillCategory, usize)> = None;

    for (category, skills) in by_category {
        match strongest {
            Some((_, best)) if skills.len() <= best => {}
            _ => strongest = Some((*category, skills.len())),
        }
    }

    strongest.map(|(category, _)| category)
}

fn recommendations(
    missing: &BTreeMap<SkillCategory, Vec<String>>,
    matched: &BTreeMap<SkillCategory, Vec<String>>,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    for category in PRIORITY_CATEGORIES {
        let Some(skills) = missing.get(&category) else {
            continue;
        };

        let (priority, reason) = if matched.contains_key(&category) {
            (
                Priority::Medium,
                format!("Build on your existing {} knowledge", category.label()),
            )
        } else {
            (
                Priority::High,
                format!("Essential {} skills for this role", category.label()),
            )
        };

        recommendations.push(Recommendation {
            category: category.display_name(),
            skills: skills.iter().take(PRIORITY_SKILLS_PER_RECOMMENDATION).cloned().collect(),
            priority,
            reason,
        });
    }

    for (category, skills) in missing {
        if PRIORITY_CATEGORIES.contains(category) {
            continue;
        }

        recommendations.push(Recommendation {
            category: category.display_name(),
            skills: skills.iter().take(OTHER_SKILLS_PER_RECOMMENDATION).cloned().collect(),
            priority: Priority::Low,
            reason: format!("Nice-to-have {} skills", category.label()),
        });
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

fn summary(matched: usize, missing: usize, required: usize) -> String {
    if required == 0 {
        return "No specific skills were identified in the job description.".to_string();
    }

    let percentage = matched as f64 / required as f64 * 100.0;

    if percentage >= 80.0 {
        format!("Strong candidate! You have {}/{} required skills.", matched, required)
    } else if percentage >= 60.0 {
        format!(
            "Good fit with room to grow. You have {}/{} required skills.",
            matched, required
        )
    } else if percentage >= 40.0 {
        format!(
            "Moderate fit. Focus on acquiring {} missing skills to strengthen your profile.",
            missing
        )
    } else {
        format!(
            "Significant skill gap. Consider upskilling in {} areas before applying.",
            missing
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> GapAnalyzer {
        GapAnalyzer::new(SkillTaxonomy::builtin())
    }

    #[test]
    fn test_basic_gap_scenario() {
        let result = analyzer().analyze(&["Python 3", "SQL", "React"], &["python", "sql", "docker"]);

        assert_eq!(result.matched_skills.skills, vec!["python", "sql"]);
        assert_eq!(result.missing_skills.skills, vec!["docker"]);
        assert_eq!(result.extra_skills.skills, vec!["react"]);
        assert_eq!(result.matched_skills.count, 2);

        // 2 of 3 required skills is 66.7%
        assert_eq!(result.summary, "Good fit with room to grow. You have 2/3 required skills.");
        assert_eq!(
            result.insights[0],
            "You match 66.7% of the required skills for this position."
        );
        assert_eq!(result.insights[1], "You're missing 1 key skill(s): docker.");

        assert_eq!(result.recommendations.len(), 1);
        let rec = &result.recommendations[0];
        assert_eq!(rec.category, "Cloud Devops");
        assert_eq!(rec.priority, Priority::High);
        assert_eq!(rec.reason, "Essential cloud devops skills for this role");
    }

    #[test]
    fn test_moderate_fit_band() {
        let result = analyzer().analyze(
            &["python", "sql"],
            &["python", "sql", "docker", "kubernetes"],
        );
        assert_eq!(
            result.summary,
            "Moderate fit. Focus on acquiring 2 missing skills to strengthen your profile."
        );
    }

    #[test]
    fn test_partition_property() {
        let resume = ["python", "Rust", "docker", "figma", "Expert Go"];
        let job = ["rust", "go", "kubernetes", "python 3.11", "terraform"];
        let result = analyzer().analyze(&resume, &job);

        let matched: BTreeSet<_> = result.matched_skills.skills.iter().cloned().collect();
        let missing: BTreeSet<_> = result.missing_skills.skills.iter().cloned().collect();
        let extra: BTreeSet<_> = result.extra_skills.skills.iter().cloned().collect();

        assert!(matched.is_disjoint(&missing));
        assert!(matched.is_disjoint(&extra));
        assert!(missing.is_disjoint(&extra));

        let job_set: BTreeSet<_> = matched.union(&missing).cloned().collect();
        assert_eq!(job_set.len(), 5);
        let resume_set: BTreeSet<_> = matched.union(&extra).cloned().collect();
        assert_eq!(resume_set.len(), 5);

        let categorized: usize = result.missing_skills.by_category.values().map(Vec::len).sum();
        assert_eq!(categorized, result.missing_skills.count);
    }

    #[test]
    fn test_no_job_skills() {
        let result = analyzer().analyze(&["python"], &[] as &[&str]);

        assert_eq!(result.summary, "No specific skills were identified in the job description.");
        assert_eq!(
            result.insights[0],
            "Excellent! You have all the required skills for this position."
        );
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_two_missing_skills_are_named() {
        let result = analyzer().analyze(&["python"], &["python", "docker", "aws"]);
        assert!(result
            .insights
            .contains(&"You're missing 2 key skill(s): aws, docker.".to_string()));
    }

    #[test]
    fn test_many_missing_skills_are_counted() {
        let result = analyzer().analyze(
            &[] as &[&str],
            &["aws", "docker", "react", "rust", "sql"],
        );

        assert_eq!(
            result.insights[1],
            "You're missing 5 skills. Focus on the most critical ones first."
        );
        assert!(result.summary.starts_with("Significant skill gap. Consider upskilling in 5 areas"));
        assert_eq!(result.insights.len(), 2);
    }

    #[test]
    fn test_strongest_alignment_ties_break_alphabetically() {
        // one cloud_devops and one web_frontend match
        let result = analyzer().analyze(&["vue", "docker"], &["vue", "docker"]);
        assert_eq!(
            result.insights.last().unwrap(),
            "Your strongest alignment is in cloud devops skills."
        );

        let result = analyzer().analyze(&["vue", "react", "docker"], &["vue", "react", "docker"]);
        assert_eq!(
            result.insights.last().unwrap(),
            "Your strongest alignment is in web frontend skills."
        );
    }

    #[test]
    fn test_recommendation_priorities_and_order() {
        let resume = ["python"];
        let job = [
            "python", "rust", "kubernetes", "react", "leadership", "git", "tableau", "cobol",
        ];
        let result = analyzer().analyze(&resume, &job);

        let order: Vec<(&str, Priority)> = result
            .recommendations
            .iter()
            .map(|r| (r.category.as_str(), r.priority))
            .collect();

        assert_eq!(
            order,
            vec![
                ("Programming Languages", Priority::Medium),
                ("Web Frontend", Priority::High),
                ("Cloud Devops", Priority::High),
                ("Data Science", Priority::Low),
                ("Other", Priority::Low),
            ]
        );
        assert_eq!(result.recommendations[0].skills, vec!["rust"]);
        assert_eq!(
            result.recommendations[0].reason,
            "Build on your existing programming languages knowledge"
        );
        assert_eq!(result.recommendations[3].reason, "Nice-to-have data science skills");
    }

    #[test]
    fn test_recommendation_skill_caps() {
        let job = [
            "python", "java", "rust", "go", "ruby", "php", "swift", "cobol", "fortran", "ada",
            "pascal",
        ];
        let result = analyzer().analyze(&[] as &[&str], &job);

        assert_eq!(result.recommendations[0].category, "Programming Languages");
        assert_eq!(result.recommendations[0].skills.len(), 5);
        assert_eq!(result.recommendations[1].category, "Other");
        assert_eq!(result.recommendations[1].skills, vec!["ada", "cobol", "fortran"]);
    }

    #[test]
    fn test_gap_analysis_is_deterministic() {
        let analyzer = analyzer();
        let first = analyzer.analyze(&["python", "docker"], &["rust", "docker", "aws"]);
        let second = analyzer.analyze(&["python", "docker"], &["rust", "docker", "aws"]);

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
