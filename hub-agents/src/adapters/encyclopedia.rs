//! Encyclopedia adapter (Wikipedia search API)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hub_core::{text, AdapterId, Category, RawHit, SourceType, WIKIPEDIA};
use hub_net::{strip_tags, HttpClient};
use serde::Deserialize;
use tracing::debug;

use crate::{AdapterError, SourceAdapter};

#[derive(Debug, Deserialize)]
struct WikipediaResponse {
    #[serde(default)]
    query: Option<WikipediaQuery>,
}

#[derive(Debug, Deserialize)]
struct WikipediaQuery {
    #[serde(default)]
    search: Vec<WikipediaPage>,
}

#[derive(Debug, Deserialize)]
struct WikipediaPage {
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

/// Article URL for a page title
pub fn article_url(title: &str) -> String {
    format!(
        "https://en.wikipedia.org/wiki/{}",
        urlencoding::encode(&title.trim().replace(' ', "_"))
    )
}

/// Same backend for every category
pub struct EncyclopediaAdapter {
    http: HttpClient,
}

impl EncyclopediaAdapter {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn parse(body: &str, limit: usize) -> Result<Vec<RawHit>, AdapterError> {
        let response: WikipediaResponse = serde_json::from_str(body)
            .map_err(|e| AdapterError::Unavailable(format!("malformed Wikipedia response: {}", e)))?;

        Ok(response
            .query
            .map(|q| q.search)
            .unwrap_or_default()
            .into_iter()
            .filter(|page| !page.title.trim().is_empty())
            .take(limit)
            .map(|page| {
                RawHit::new(
                    AdapterId::Encyclopedia,
                    SourceType::Encyclopedia,
                    page.title.trim(),
                    article_url(&page.title),
                )
                .with_snippet(strip_tags(&page.snippet))
                .with_last_updated(page.timestamp)
            })
            .collect())
    }
}

#[async_trait]
impl SourceAdapter for EncyclopediaAdapter {
    fn id(&self) -> AdapterId {
        AdapterId::Encyclopedia
    }

    fn provider(&self) -> &str {
        WIKIPEDIA.name
    }

    async fn fetch(
        &self,
        query: &str,
        _category: Category,
        limit: usize,
    ) -> Result<Vec<RawHit>, AdapterError> {
        let url = WIKIPEDIA.build_url(&text::normalize_whitespace(query), limit);
        let body = self.http.get_text(&url, &[("Accept", "application/json")]).await?;
        let hits = Self::parse(&body, limit)?;

        debug!("Wikipedia returned {} hits", hits.len());
        Ok(hits)
    }
}
