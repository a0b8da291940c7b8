//! Summarizer strategies
//!
//! - **Template**: deterministic, never fails
//! - **Model**: LLM-written synthesis over the ranked sources
//! - **Fallback**: tries the model, falls back to the template on any error

use async_trait::async_trait;
use hub_core::{text, Category, Query, ScoredHit};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::SharedBackend;

/// Snippet length in template highlights
const HIGHLIGHT_SNIPPET_CHARS: usize = 160;
/// Snippet length in model context
const CONTEXT_SNIPPET_CHARS: usize = 500;

/// System prompt for research synthesis
const SUMMARY_SYSTEM_PROMPT: &str = r#"
You are a research assistant. You are given a research query, its topic category and a ranked list of sources (title, URL, excerpt).

Write a concise synthesis of what the sources say about the query.

Rules:
1. Use only the information in the provided sources
2. Cite sources inline by their number, e.g. [2]
3. Mention disagreements between sources when present
4. Keep it under 250 words, plain prose, no headings
5. If the sources do not answer the query, say so plainly

Query: {query}
Category: {category}

Sources:
"#;

/// Summarizer errors
#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("Summarizer unavailable: {0}")]
    Unavailable(String),
}

/// Turns a ranked source list into prose
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Strategy name for status reporting
    fn name(&self) -> &str;

    async fn summarize(
        &self,
        query: &Query,
        category: Category,
        hits: &[ScoredHit],
    ) -> Result<String, SummarizerError>;
}

/// Thread-safe reference to a summarizer
pub type SharedSummarizer = Arc<dyn Summarizer>;

/// Deterministic summary built from the top hits
#[derive(Debug, Clone)]
pub struct TemplateSummarizer {
    max_highlights: usize,
}

impl Default for TemplateSummarizer {
    fn default() -> Self {
        Self { max_highlights: 5 }
    }
}

impl TemplateSummarizer {
    pub fn new(max_highlights: usize) -> Self {
        Self { max_highlights }
    }

    /// Infallible rendering used by the trait impl and by the fallback
    pub fn render(&self, query: &Query, category: Category, hits: &[ScoredHit]) -> String {
        let query_text = text::normalize_whitespace(&query.text);

        if hits.is_empty() {
            return format!(
                "No sources were found for '{}' (category: {}). Try broader or different search terms.",
                query_text, category
            );
        }

        let mut adapters: Vec<_> = hits.iter().map(|h| h.hit.origin_adapter).collect();
        adapters.sort();
        adapters.dedup();

        let mut out = format!(
            "Research on '{}' (category: {}) found {} source{} across {} adapter{}.",
            query_text,
            category,
            hits.len(),
            if hits.len() == 1 { "" } else { "s" },
            adapters.len(),
            if adapters.len() == 1 { "" } else { "s" },
        );

        let highlights = self.max_highlights.min(query.mode().highlights());
        if highlights == 0 {
            return out;
        }

        out.push_str("\n\nKey sources:");
        for (i, scored) in hits.iter().take(highlights).enumerate() {
            let host = text::host_of(&scored.hit.url).unwrap_or_else(|| scored.hit.source_type.to_string());
            out.push_str(&format!("\n{}. {} ({})", i + 1, scored.hit.title, host));

            let snippet = text::normalize_whitespace(&scored.hit.snippet);
            if !snippet.is_empty() {
                out.push_str(": ");
                out.push_str(&text::truncate_chars(&snippet, HIGHLIGHT_SNIPPET_CHARS));
            }
        }

        out
    }
}

#[async_trait]
impl Summarizer for TemplateSummarizer {
    fn name(&self) -> &str {
        "template"
    }

    async fn summarize(
        &self,
        query: &Query,
        category: Category,
        hits: &[ScoredHit],
    ) -> Result<String, SummarizerError> {
        Ok(self.render(query, category, hits))
    }
}

/// LLM-written summary with a bounded wait
pub struct ModelSummarizer {
    backend: SharedBackend,
    timeout: Duration,
    max_sources: usize,
}

impl ModelSummarizer {
    pub fn new(backend: SharedBackend, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            max_sources: 10,
        }
    }

    pub fn with_max_sources(mut self, max_sources: usize) -> Self {
        self.max_sources = max_sources;
        self
    }

    fn build_context(&self, hits: &[ScoredHit]) -> String {
        hits.iter()
            .take(self.max_sources)
            .enumerate()
            .map(|(i, scored)| {
                format!(
                    "[{}] {}\nURL: {}\nType: {}\nExcerpt: {}\n",
                    i + 1,
                    scored.hit.title,
                    scored.hit.url,
                    scored.hit.source_type,
                    text::truncate_chars(&text::normalize_whitespace(&scored.hit.snippet), CONTEXT_SNIPPET_CHARS)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Summarizer for ModelSummarizer {
    fn name(&self) -> &str {
        self.backend.model_name()
    }

    async fn summarize(
        &self,
        query: &Query,
        category: Category,
        hits: &[ScoredHit],
    ) -> Result<String, SummarizerError> {
        if hits.is_empty() {
            return Err(SummarizerError::Unavailable("no sources to summarize".to_string()));
        }

        let system = SUMMARY_SYSTEM_PROMPT
            .replace("{query}", query.text.trim())
            .replace("{category}", category.as_str());
        let context = self.build_context(hits);

        let response = tokio::time::timeout(self.timeout, self.backend.generate(&system, &context))
            .await
            .map_err(|_| {
                SummarizerError::Unavailable(format!("timed out after {:?}", self.timeout))
            })?
            .map_err(|e| SummarizerError::Unavailable(e.to_string()))?;

        if response.trim().is_empty() {
            return Err(SummarizerError::Unavailable("empty response".to_string()));
        }

        Ok(response)
    }
}

/// Model summary when available, template otherwise
pub struct FallbackSummarizer {
    model: Option<ModelSummarizer>,
    template: TemplateSummarizer,
    name: String,
}

impl FallbackSummarizer {
    pub fn new(model: Option<ModelSummarizer>, template: TemplateSummarizer) -> Self {
        let name = match &model {
            Some(m) => format!("model:{} (template fallback)", m.name()),
            None => "template".to_string(),
        };
        Self { model, template, name }
    }

    /// Template-only
    pub fn template_only() -> Self {
        Self::new(None, TemplateSummarizer::default())
    }
}

#[async_trait]
impl Summarizer for FallbackSummarizer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn summarize(
        &self,
        query: &Query,
        category: Category,
        hits: &[ScoredHit],
    ) -> Result<String, SummarizerError> {
        // Nothing for the model to work with on an empty list
        if let Some(model) = self.model.as_ref().filter(|_| !hits.is_empty()) {
            match model.summarize(query, category, hits).await {
                Ok(summary) => {
                    info!("Model summary generated by {}", model.name());
                    return Ok(summary);
                }
                Err(e) => warn!("Model summarizer failed, using template: {}", e),
            }
        }

        Ok(self.template.render(query, category, hits))
    }
}
