//! General web search adapter

use async_trait::async_trait;
use hub_core::{text, AdapterId, Category, RawHit, ScoringTables, BRAVE, DUCKDUCKGO};
use hub_net::{parse_duckduckgo_results, strip_tags, HttpClient};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::{refine_query, AdapterError, SourceAdapter};

/// Largest `count` the Brave web search API accepts
const BRAVE_MAX_COUNT: usize = 20;

fn brave_url(query: &str, limit: usize) -> String {
    BRAVE.build_url(query, limit.min(BRAVE_MAX_COUNT))
}

/// Brave Search response (subset)
#[derive(Debug, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
}

#[derive(Debug, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    title: String,
    url: String,
    #[serde(default)]
    description: String,
}

/// Web search: Brave API when a key is configured, DuckDuckGo HTML otherwise
pub struct WebSearchAdapter {
    http: HttpClient,
    tables: Arc<ScoringTables>,
    brave_api_key: Option<String>,
}

impl WebSearchAdapter {
    pub fn new(http: HttpClient, tables: Arc<ScoringTables>, brave_api_key: Option<String>) -> Self {
        Self {
            http,
            tables,
            brave_api_key: brave_api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Build a hit, labelling it news/academic/web by host
    fn to_hit(&self, title: &str, url: &str, snippet: &str) -> RawHit {
        let source_type = text::host_of(url)
            .map(|host| self.tables.source_type_for_host(&host))
            .unwrap_or(hub_core::SourceType::Web);

        RawHit::new(AdapterId::Web, source_type, title.trim(), url.trim())
            .with_snippet(text::normalize_whitespace(snippet))
    }

    fn parse_brave(&self, body: &str, limit: usize) -> Result<Vec<RawHit>, AdapterError> {
        let response: BraveResponse = serde_json::from_str(body)
            .map_err(|e| AdapterError::Unavailable(format!("malformed Brave response: {}", e)))?;

        Ok(response
            .web
            .map(|w| w.results)
            .unwrap_or_default()
            .into_iter()
            .filter(|r| !r.title.trim().is_empty() && r.url.starts_with("http"))
            .take(limit)
            .map(|r| self.to_hit(&strip_tags(&r.title), &r.url, &strip_tags(&r.description)))
            .collect())
    }

    fn parse_duckduckgo(&self, html: &str, limit: usize) -> Vec<RawHit> {
        parse_duckduckgo_results(html, limit)
            .into_iter()
            .map(|link| self.to_hit(&link.title, &link.url, &link.snippet))
            .collect()
    }
}

#[async_trait]
impl SourceAdapter for WebSearchAdapter {
    fn id(&self) -> AdapterId {
        AdapterId::Web
    }

    fn provider(&self) -> &str {
        if self.brave_api_key.is_some() {
            BRAVE.name
        } else {
            DUCKDUCKGO.name
        }
    }

    async fn fetch(
        &self,
        query: &str,
        category: Category,
        limit: usize,
    ) -> Result<Vec<RawHit>, AdapterError> {
        let shaped = refine_query(AdapterId::Web, query, category, &self.tables);

        let hits = match &self.brave_api_key {
            Some(key) => {
                let url = brave_url(&shaped, limit);
                let body = self
                    .http
                    .get_text(
                        &url,
                        &[("Accept", "application/json"), ("X-Subscription-Token", key.as_str())],
                    )
                    .await?;
                self.parse_brave(&body, limit)?
            }
            None => {
                let url = DUCKDUCKGO.build_url(&shaped, limit);
                let html = self.http.get_text(&url, &[("Accept", "text/html")]).await?;
                self.parse_duckduckgo(&html, limit)
            }
        };

        debug!("{} returned {} hits for '{}'", self.provider(), hits.len(), shaped);
        Ok(hits)
    }
}
