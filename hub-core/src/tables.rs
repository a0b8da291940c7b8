//! Static scoring tables
//!
//! Category keyword lists (in classification priority order), the
//! per-(source type, category) authority table, and the per-category hints
//! the adapters use. Loaded once from TOML at startup and shared read-only.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

use crate::{text, Category, SourceType, BASELINE_CREDIBILITY};

const EMBEDDED_TABLES: &str = include_str!("../tables.toml");

/// Errors loading scoring tables
#[derive(Debug, Error)]
pub enum TablesError {
    #[error("Failed to read tables file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse tables: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid tables: {0}")]
    Invalid(String),
}

/// Weights of the combined ranking score
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScoreWeights {
    pub relevance: f64,
    pub credibility: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            relevance: 0.6,
            credibility: 0.4,
        }
    }
}

impl ScoreWeights {
    /// Weighted average of relevance and credibility
    pub fn combine(&self, relevance: f64, credibility: f64) -> f64 {
        let total = self.relevance + self.credibility;
        if total <= 0.0 {
            return 0.0;
        }
        ((relevance * self.relevance + credibility * self.credibility) / total).clamp(0.0, 1.0)
    }
}

/// Authority weights for one source type
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorityRow {
    /// Weight for categories without an override
    #[serde(default)]
    pub default: Option<f64>,
    /// Per-category overrides
    #[serde(default)]
    pub categories: HashMap<Category, f64>,
}

/// Credibility lookup table
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorityTable {
    /// Weight for unknown combinations
    #[serde(default = "default_baseline")]
    pub baseline: f64,
    #[serde(default)]
    pub sources: HashMap<SourceType, AuthorityRow>,
}

fn default_baseline() -> f64 {
    BASELINE_CREDIBILITY
}

impl AuthorityTable {
    /// Credibility for a (source type, category) pair
    pub fn credibility(&self, source_type: SourceType, category: Category) -> f64 {
        self.sources
            .get(&source_type)
            .and_then(|row| row.categories.get(&category).copied().or(row.default))
            .unwrap_or(self.baseline)
            .clamp(0.0, 1.0)
    }
}

/// Keyword list for one category
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryKeywords {
    pub category: Category,
    pub keywords: Vec<String>,
}

/// Host lists used to label web hits
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostLists {
    #[serde(default)]
    pub news: Vec<String>,
    #[serde(default)]
    pub academic: Vec<String>,
    #[serde(default)]
    pub academic_suffixes: Vec<String>,
}

/// All static tables, immutable after loading
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringTables {
    #[serde(default)]
    pub weights: ScoreWeights,
    pub authority: AuthorityTable,
    /// Classification order: first matching entry wins
    pub categories: Vec<CategoryKeywords>,
    #[serde(default)]
    pub web_bias: HashMap<Category, String>,
    #[serde(default)]
    pub community_subsources: HashMap<Category, Vec<String>>,
    #[serde(default)]
    pub hosts: HostLists,
}

impl ScoringTables {
    /// Tables compiled into the binary
    pub fn embedded() -> Result<Self, TablesError> {
        Self::from_toml_str(EMBEDDED_TABLES)
    }

    /// Load tables from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TablesError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse, normalize and validate tables
    pub fn from_toml_str(content: &str) -> Result<Self, TablesError> {
        let mut tables: ScoringTables = toml::from_str(content)?;
        tables.normalize();
        tables.validate()?;
        Ok(tables)
    }

    fn normalize(&mut self) {
        for entry in &mut self.categories {
            for keyword in &mut entry.keywords {
                // Same tokenization as queries, so "covid-19" matches "covid 19"
                *keyword = text::tokenize(keyword).join(" ");
            }
            entry.keywords.retain(|k| !k.is_empty());
        }
        for host in self.hosts.news.iter_mut().chain(self.hosts.academic.iter_mut()) {
            *host = host.trim().to_lowercase();
        }
    }

    fn validate(&self) -> Result<(), TablesError> {
        if self.weights.relevance < 0.0
            || self.weights.credibility < 0.0
            || self.weights.relevance + self.weights.credibility <= 0.0
        {
            return Err(TablesError::Invalid(
                "score weights must be non-negative with a positive sum".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.categories {
            if entry.category == Category::General {
                return Err(TablesError::Invalid(
                    "'general' is the fallback category and takes no keywords".to_string(),
                ));
            }
            if !seen.insert(entry.category) {
                return Err(TablesError::Invalid(format!(
                    "category '{}' listed more than once",
                    entry.category
                )));
            }
        }

        let in_range = |w: f64| (0.0..=1.0).contains(&w);
        if !in_range(self.authority.baseline) {
            return Err(TablesError::Invalid("authority baseline out of range".to_string()));
        }
        for (source_type, row) in &self.authority.sources {
            let out_of_range = row.default.is_some_and(|w| !in_range(w))
                || row.categories.values().any(|w| !in_range(*w));
            if out_of_range {
                return Err(TablesError::Invalid(format!(
                    "authority weights for '{}' must be within [0, 1]",
                    source_type
                )));
            }
        }

        Ok(())
    }

    /// Keywords configured for a category
    pub fn keywords_for(&self, category: Category) -> &[String] {
        self.categories
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.keywords.as_slice())
            .unwrap_or(&[])
    }

    pub fn credibility(&self, source_type: SourceType, category: Category) -> f64 {
        self.authority.credibility(source_type, category)
    }

    /// Extra web search terms for a category
    pub fn web_bias(&self, category: Category) -> Option<&str> {
        self.web_bias.get(&category).map(String::as_str)
    }

    /// Subreddits for a category; empty means site-wide
    pub fn community_subsources(&self, category: Category) -> &[String] {
        self.community_subsources
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Label a web hit by its host
    pub fn source_type_for_host(&self, host: &str) -> SourceType {
        let matches = |list: &[String]| {
            list.iter()
                .any(|h| host == h || host.ends_with(&format!(".{}", h)))
        };

        if matches(&self.hosts.academic)
            || self.hosts.academic_suffixes.iter().any(|s| host.ends_with(s.as_str()))
        {
            SourceType::Academic
        } else if matches(&self.hosts.news) {
            SourceType::News
        } else {
            SourceType::Web
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_tables_load() {
        let tables = ScoringTables::embedded().unwrap();
        assert_eq!(tables.categories.len(), Category::ALL.len() - 1);
        assert_eq!(tables.categories[0].category, Category::Technology);
        assert!(tables.keywords_for(Category::Automotive).contains(&"ev".to_string()));
        assert!(tables.keywords_for(Category::General).is_empty());
    }

    #[test]
    fn test_credibility_lookup() {
        let tables = ScoringTables::embedded().unwrap();
        assert!(tables.credibility(SourceType::Encyclopedia, Category::Technology) >= 0.9);
        assert_eq!(tables.credibility(SourceType::Discussion, Category::Technology), 0.75);
        assert_eq!(tables.credibility(SourceType::Discussion, Category::History), 0.65);

        let web = tables.credibility(SourceType::Web, Category::General);
        assert!((0.7..=0.9).contains(&web));
    }

    #[test]
    fn test_unknown_combination_uses_baseline() {
        let tables = ScoringTables::from_toml_str(
            r#"
            [authority]
            baseline = 0.5
            [authority.sources.web]
            [authority.sources.web.categories]
            travel = 0.8

            [[categories]]
            category = "travel"
            keywords = ["Trip"]
            "#,
        )
        .unwrap();

        assert_eq!(tables.credibility(SourceType::Web, Category::Travel), 0.8);
        assert_eq!(tables.credibility(SourceType::Web, Category::Food), 0.5);
        assert_eq!(tables.credibility(SourceType::Code, Category::Travel), 0.5);
        assert_eq!(tables.keywords_for(Category::Travel), &["trip".to_string()]);
        assert_eq!(tables.weights, ScoreWeights::default());
    }

    #[test]
    fn test_keywords_tokenized_like_queries() {
        let tables = ScoringTables::from_toml_str(
            r#"
            [authority]
            [[categories]]
            category = "health"
            keywords = ["COVID-19", "  long   covid ", "--"]
            "#,
        )
        .unwrap();
        assert_eq!(
            tables.keywords_for(Category::Health),
            &["covid 19".to_string(), "long covid".to_string()]
        );
    }

    #[test]
    fn test_rejects_duplicate_category() {
        let result = ScoringTables::from_toml_str(
            r#"
            [authority]
            [[categories]]
            category = "food"
            keywords = ["recipe"]
            [[categories]]
            category = "food"
            keywords = ["cooking"]
            "#,
        );
        assert!(matches!(result, Err(TablesError::Invalid(_))));
    }

    #[test]
    fn test_rejects_out_of_range_weight() {
        let result = ScoringTables::from_toml_str(
            r#"
            [authority.sources.news]
            default = 1.5
            [[categories]]
            category = "food"
            keywords = ["recipe"]
            "#,
        );
        assert!(matches!(result, Err(TablesError::Invalid(_))));
    }

    #[test]
    fn test_source_type_for_host() {
        let tables = ScoringTables::embedded().unwrap();
        assert_eq!(tables.source_type_for_host("arxiv.org"), SourceType::Academic);
        assert_eq!(tables.source_type_for_host("cs.stanford.edu"), SourceType::Academic);
        assert_eq!(tables.source_type_for_host("reuters.com"), SourceType::News);
        assert_eq!(tables.source_type_for_host("example.com"), SourceType::Web);
    }

    #[test]
    fn test_weights_combine() {
        let weights = ScoreWeights::default();
        assert!((weights.combine(1.0, 0.5) - 0.8).abs() < 1e-9);
        let zero = ScoreWeights {
            relevance: 0.0,
            credibility: 0.0,
        };
        assert_eq!(zero.combine(1.0, 1.0), 0.0);
    }
}
