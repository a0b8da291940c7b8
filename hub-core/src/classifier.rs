//! Topic classifier
//!
//! Maps free-text queries to a `Category` by keyword membership, testing
//! categories in the tables' priority order. First match wins; no match
//! yields `Category::General`.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{text, Category, ResearchError, ScoringTables};

/// Result of classifying a query
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: Category,
    /// Category keywords found in the query
    pub matched_keywords: Vec<String>,
    /// Content terms of the query (stopwords removed)
    pub terms: Vec<String>,
}

/// Keyword-based topic classifier
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    tables: Arc<ScoringTables>,
}

impl TopicClassifier {
    pub fn new(tables: Arc<ScoringTables>) -> Self {
        Self { tables }
    }

    /// Classify a query. Fails only on empty or whitespace-only text.
    pub fn classify(&self, query_text: &str) -> Result<Category, ResearchError> {
        self.classify_detailed(query_text).map(|c| c.category)
    }

    pub fn classify_detailed(&self, query_text: &str) -> Result<Classification, ResearchError> {
        if query_text.trim().is_empty() {
            return Err(ResearchError::InvalidQuery(
                "query must not be empty".to_string(),
            ));
        }

        let tokens = text::tokenize(query_text);
        let token_set: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        // Space-padded so phrase keywords only match on word boundaries
        let padded = format!(" {} ", tokens.join(" "));
        let terms = text::query_terms(query_text);

        for entry in &self.tables.categories {
            let matched: Vec<String> = entry
                .keywords
                .iter()
                .filter(|keyword| {
                    if keyword.contains(' ') {
                        padded.contains(&format!(" {} ", keyword))
                    } else {
                        token_set.contains(keyword.as_str())
                    }
                })
                .cloned()
                .collect();

            if !matched.is_empty() {
                return Ok(Classification {
                    category: entry.category,
                    matched_keywords: matched,
                    terms,
                });
            }
        }

        Ok(Classification {
            category: Category::General,
            matched_keywords: Vec::new(),
            terms,
        })
    }
}
