//! Curated skill knowledge base: categories, synonyms and canonical forms

use crate::config::TaxonomyConfig;
use crate::error::{Result, ResumeFitError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

/// Skill categories. Variant order matches the alphabetical order of the
/// serialized names, so ordered maps keyed by category sort by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    CloudDevops,
    DataScience,
    Databases,
    MlAi,
    Other,
    ProgrammingLanguages,
    SoftSkills,
    ToolsPlatforms,
    WebBackend,
    WebFrontend,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 10] = [
        SkillCategory::CloudDevops,
        SkillCategory::DataScience,
        SkillCategory::Databases,
        SkillCategory::MlAi,
        SkillCategory::Other,
        SkillCategory::ProgrammingLanguages,
        SkillCategory::SoftSkills,
        SkillCategory::ToolsPlatforms,
        SkillCategory::WebBackend,
        SkillCategory::WebFrontend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::CloudDevops => "cloud_devops",
            SkillCategory::DataScience => "data_science",
            SkillCategory::Databases => "databases",
            SkillCategory::MlAi => "ml_ai",
            SkillCategory::Other => "other",
            SkillCategory::ProgrammingLanguages => "programming_languages",
            SkillCategory::SoftSkills => "soft_skills",
            SkillCategory::ToolsPlatforms => "tools_platforms",
            SkillCategory::WebBackend => "web_backend",
            SkillCategory::WebFrontend => "web_frontend",
        }
    }

    /// Lowercase words for use inside sentences, e.g. "web frontend"
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Title-cased heading, e.g. "Web Frontend" or "Ml Ai"
    pub fn display_name(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '-'], "_");
        SkillCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| format!("Unknown skill category: {}", s))
    }
}

const CATEGORY_TABLE: &[(SkillCategory, &[&str])] = &[
    (
        SkillCategory::ProgrammingLanguages,
        &[
            "python", "java", "javascript", "typescript", "c++", "c#", "go", "rust", "ruby",
            "php", "swift", "kotlin", "scala", "r",
        ],
    ),
    (
        SkillCategory::WebFrontend,
        &[
            "react", "angular", "vue", "html", "css", "sass", "tailwind", "bootstrap",
            "webpack", "vite", "next.js", "nuxt", "svelte",
        ],
    ),
    (
        SkillCategory::WebBackend,
        &[
            "node.js", "express", "django", "flask", "fastapi", "spring boot", "asp.net",
            "rails", "laravel", "nest.js",
        ],
    ),
    (
        SkillCategory::Databases,
        &[
            "mysql", "postgresql", "mongodb", "redis", "elasticsearch", "cassandra",
            "dynamodb", "oracle", "sql server", "sqlite",
        ],
    ),
    (
        SkillCategory::CloudDevops,
        &[
            "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "jenkins",
            "gitlab ci", "github actions", "ansible", "ci/cd",
        ],
    ),
    (
        SkillCategory::MlAi,
        &[
            "machine learning", "deep learning", "tensorflow", "pytorch", "scikit-learn",
            "keras", "nlp", "computer vision", "transformers", "llm", "opencv", "pandas",
            "numpy", "jupyter",
        ],
    ),
    (
        SkillCategory::DataScience,
        &[
            "data analysis", "data visualization", "tableau", "power bi", "matplotlib",
            "seaborn", "plotly", "statistics", "sql", "etl",
        ],
    ),
    (
        SkillCategory::ToolsPlatforms,
        &[
            "git", "github", "gitlab", "jira", "confluence", "slack", "vs code", "intellij",
            "postman", "figma", "linux", "bash",
        ],
    ),
    (
        SkillCategory::SoftSkills,
        &[
            "leadership", "communication", "teamwork", "problem solving", "agile", "scrum",
            "project management", "mentoring",
        ],
    ),
];

const SYNONYM_TABLE: &[(&str, &[&str])] = &[
    ("javascript", &["js", "javascript", "ecmascript"]),
    ("typescript", &["ts", "typescript"]),
    ("python", &["python", "python3", "py"]),
    ("machine learning", &["ml", "machine learning", "maching learning"]),
    ("deep learning", &["dl", "deep learning", "neural networks"]),
    (
        "natural language processing",
        &["nlp", "natural language processing", "text mining"],
    ),
    ("computer vision", &["cv", "computer vision", "image processing"]),
    ("react", &["react", "reactjs", "react.js"]),
    ("node.js", &["node", "nodejs", "node.js"]),
    ("postgresql", &["postgres", "postgresql", "psql"]),
    ("mongodb", &["mongo", "mongodb"]),
    ("kubernetes", &["k8s", "kubernetes"]),
    ("continuous integration", &["ci", "continuous integration", "ci/cd"]),
];

static BUILTIN: LazyLock<Arc<SkillTaxonomy>> = LazyLock::new(|| {
    Arc::new(
        SkillTaxonomy::from_tables(builtin_categories(), builtin_synonyms())
            .expect("built-in taxonomy tables are consistent"),
    )
});

/// Read-only skill knowledge base
#[derive(Debug, Clone)]
pub struct SkillTaxonomy {
    skill_to_category: HashMap<String, SkillCategory>,
    synonyms: HashMap<String, String>,
    variants_by_canonical: HashMap<String, BTreeSet<String>>,
}

impl SkillTaxonomy {
    /// Shared built-in taxonomy, constructed on first use
    pub fn builtin() -> Arc<SkillTaxonomy> {
        Arc::clone(&BUILTIN)
    }

    /// Built-in tables extended with user additions from configuration
    pub fn from_config(config: &TaxonomyConfig) -> Result<Self> {
        let mut categories = builtin_categories();
        for (name, skills) in &config.extra_skills {
            let category = name.parse::<SkillCategory>().map_err(ResumeFitError::Configuration)?;
            categories.push((category, skills.clone()));
        }

        let mut synonyms = builtin_synonyms();
        synonyms.extend(
            config
                .extra_synonyms
                .iter()
                .map(|(canonical, variants)| (canonical.clone(), variants.clone())),
        );

        Self::from_tables(categories, synonyms)
    }

    /// Build a taxonomy from category and synonym tables.
    ///
    /// Fails when a skill lands in two categories, a variant maps to two
    /// canonical skills, or a canonical skill is a variant of another one.
    pub fn from_tables(
        categories: Vec<(SkillCategory, Vec<String>)>,
        synonyms: Vec<(String, Vec<String>)>,
    ) -> Result<Self> {
        let mut skill_to_category: HashMap<String, SkillCategory> = HashMap::new();

        for (category, skills) in categories {
            for skill in skills {
                let key = normalize_key(&skill);
                if key.is_empty() {
                    continue;
                }
                match skill_to_category.get(&key) {
                    Some(existing) if *existing != category => {
                        return Err(ResumeFitError::Configuration(format!(
                            "Skill '{}' is listed under both {} and {}",
                            key, existing, category
                        )));
                    }
                    _ => {
                        skill_to_category.insert(key, category);
                    }
                }
            }
        }

        let mut synonym_map: BTreeMap<String, String> = BTreeMap::new();

        for (canonical, variants) in synonyms {
            let canonical = normalize_key(&canonical);
            if canonical.is_empty() {
                continue;
            }

            let keys = std::iter::once(canonical.clone())
                .chain(variants.iter().map(|variant| normalize_key(variant)))
                .filter(|key| !key.is_empty());

            for key in keys {
                match synonym_map.get(&key) {
                    Some(existing) if *existing != canonical => {
                        return Err(ResumeFitError::Configuration(format!(
                            "Variant '{}' maps to both '{}' and '{}'",
                            key, existing, canonical
                        )));
                    }
                    _ => {
                        synonym_map.insert(key, canonical.clone());
                    }
                }
            }
        }

        // Canonical skills without a category take one from a categorized variant
        for (variant, canonical) in &synonym_map {
            if skill_to_category.contains_key(canonical) {
                continue;
            }
            if let Some(category) = skill_to_category.get(variant).copied() {
                skill_to_category.insert(canonical.clone(), category);
            }
        }

        let mut variants_by_canonical: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (variant, canonical) in &synonym_map {
            variants_by_canonical
                .entry(canonical.clone())
                .or_default()
                .insert(variant.clone());
        }

        log::debug!(
            "Skill taxonomy built: {} categorized skills, {} synonym entries",
            skill_to_category.len(),
            synonym_map.len()
        );

        Ok(Self {
            skill_to_category,
            synonyms: synonym_map.into_iter().collect(),
            variants_by_canonical,
        })
    }

    /// Canonical skill for a surface form; unknown terms pass through unchanged
    pub fn canonical_form(&self, term: &str) -> String {
        let key = normalize_key(term);
        match self.synonyms.get(&key) {
            Some(canonical) => canonical.clone(),
            None => key,
        }
    }

    pub fn is_known_skill(&self, term: &str) -> bool {
        let canonical = self.canonical_form(term);
        self.skill_to_category.contains_key(&canonical)
            || self.variants_by_canonical.contains_key(&canonical)
    }

    pub fn category_of(&self, term: &str) -> SkillCategory {
        let canonical = self.canonical_form(term);
        self.skill_to_category
            .get(&canonical)
            .copied()
            .unwrap_or(SkillCategory::Other)
    }

    /// The canonical form plus every variant that resolves to it
    pub fn expand(&self, term: &str) -> BTreeSet<String> {
        let canonical = self.canonical_form(term);
        let mut expanded = self
            .variants_by_canonical
            .get(&canonical)
            .cloned()
            .unwrap_or_default();
        expanded.insert(canonical);
        expanded
    }

    /// Group skills by category, skills sorted within each category
    pub fn categorize<S: AsRef<str>>(&self, skills: &[S]) -> BTreeMap<SkillCategory, Vec<String>> {
        let mut categorized: BTreeMap<SkillCategory, Vec<String>> = BTreeMap::new();

        for skill in skills {
            let skill = skill.as_ref();
            categorized
                .entry(self.category_of(skill))
                .or_default()
                .push(skill.to_string());
        }

        for skills in categorized.values_mut() {
            skills.sort();
        }

        categorized
    }

    pub fn all_skills(&self) -> Vec<String> {
        let mut skills: Vec<String> = self.skill_to_category.keys().cloned().collect();
        skills.sort();
        skills
    }

    pub fn skills_in(&self, category: SkillCategory) -> Vec<String> {
        let mut skills: Vec<String> = self
            .skill_to_category
            .iter()
            .filter(|(_, c)| **c == category)
            .map(|(skill, _)| skill.clone())
            .collect();
        skills.sort();
        skills
    }

    pub fn skill_count(&self) -> usize {
        self.skill_to_category.len()
    }
}

impl Default for SkillTaxonomy {
    fn default() -> Self {
        BUILTIN.as_ref().clone()
    }
}

fn normalize_key(term: &str) -> String {
    term.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn builtin_categories() -> Vec<(SkillCategory, Vec<String>)> {
    CATEGORY_TABLE
        .iter()
        .map(|(category, skills)| (*category, skills.iter().map(|s| s.to_string()).collect()))
        .collect()
}

fn builtin_synonyms() -> Vec<(String, Vec<String>)> {
    SYNONYM_TABLE
        .iter()
        .map(|(canonical, variants)| {
            (canonical.to_string(), variants.iter().map(|s| s.to_string()).collect())
        })
        .collect()
}
