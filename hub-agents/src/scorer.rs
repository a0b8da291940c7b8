//! Quality Scorer
//!
//! Attaches relevance and credibility to raw hits. Pure: no I/O, same inputs
//! always give the same scores.
//! - Relevance: query-term coverage of title and snippet
//! - Credibility: static (source type, category) authority table

use hub_core::{text, Category, RawHit, ScoredHit, ScoringTables};
use std::collections::HashSet;
use std::sync::Arc;

/// Weight of term coverage over title + snippet
const BODY_COVERAGE_WEIGHT: f64 = 0.7;
/// Weight of term coverage over the title alone
const TITLE_COVERAGE_WEIGHT: f64 = 0.3;
/// Bonus when the whole query phrase appears verbatim
const PHRASE_BONUS: f64 = 0.1;

/// Query terms prepared once per request
#[derive(Debug, Clone)]
pub struct QueryProfile {
    terms: Vec<String>,
    phrase: String,
}

impl QueryProfile {
    pub fn new(query: &str) -> Self {
        let mut terms = text::query_terms(query);
        if terms.is_empty() {
            // Stopword-only query: fall back to every distinct token
            let mut seen = HashSet::new();
            terms = text::tokenize(query)
                .into_iter()
                .filter(|t| seen.insert(t.clone()))
                .collect();
        }

        Self {
            terms,
            phrase: text::tokenize(query).join(" "),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    fn coverage(&self, tokens: &HashSet<String>) -> f64 {
        if self.terms.is_empty() {
            return 0.0;
        }
        let found = self.terms.iter().filter(|t| tokens.contains(*t)).count();
        found as f64 / self.terms.len() as f64
    }

    /// Relevance of a title/snippet pair, in `[0, 1]`
    pub fn relevance(&self, title: &str, snippet: &str) -> f64 {
        let title_tokens = text::tokenize(title);
        let body_tokens: Vec<String> = title_tokens
            .iter()
            .cloned()
            .chain(text::tokenize(snippet))
            .collect();

        let title_set: HashSet<String> = title_tokens.into_iter().collect();
        let body_set: HashSet<String> = body_tokens.iter().cloned().collect();

        let mut score = BODY_COVERAGE_WEIGHT * self.coverage(&body_set)
            + TITLE_COVERAGE_WEIGHT * self.coverage(&title_set);

        if !self.phrase.is_empty() {
            let padded = format!(" {} ", body_tokens.join(" "));
            if padded.contains(&format!(" {} ", self.phrase)) {
                score += PHRASE_BONUS;
            }
        }

        score.clamp(0.0, 1.0)
    }
}

/// Scores hits against the static tables
#[derive(Debug, Clone)]
pub struct QualityScorer {
    tables: Arc<ScoringTables>,
}

impl QualityScorer {
    pub fn new(tables: Arc<ScoringTables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &ScoringTables {
        &self.tables
    }

    /// Score a single hit
    pub fn score(&self, hit: &RawHit, category: Category, query: &str) -> ScoredHit {
        self.score_with(&QueryProfile::new(query), hit, category)
    }

    /// Score a batch, preparing the query once. Order is preserved.
    pub fn score_all(&self, hits: &[RawHit], category: Category, query: &str) -> Vec<ScoredHit> {
        let profile = QueryProfile::new(query);
        hits.iter()
            .map(|hit| self.score_with(&profile, hit, category))
            .collect()
    }

    fn score_with(&self, profile: &QueryProfile, hit: &RawHit, category: Category) -> ScoredHit {
        let relevance = profile.relevance(&hit.title, &hit.snippet);
        let credibility = self.tables.credibility(hit.source_type, category);
        ScoredHit::new(hit.clone(), relevance, credibility)
    }
}
