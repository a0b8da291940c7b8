//! Community discussion adapter (Reddit search)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hub_core::{text, AdapterId, Category, RawHit, ScoringTables, SourceType, REDDIT, REDDIT_SUBREDDITS};
use hub_net::HttpClient;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::{refine_query, AdapterError, SourceAdapter};

/// Maximum snippet length taken from a post body
const MAX_SNIPPET_CHARS: usize = 300;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    title: String,
    permalink: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    subreddit: String,
    #[serde(default)]
    num_comments: u64,
    #[serde(default)]
    created_utc: Option<f64>,
}

/// Reddit search, restricted to the category's subreddits when configured
pub struct CommunityAdapter {
    http: HttpClient,
    tables: Arc<ScoringTables>,
}

impl CommunityAdapter {
    pub fn new(http: HttpClient, tables: Arc<ScoringTables>) -> Self {
        Self { http, tables }
    }

    /// Search URL for a category: subreddit-restricted or site-wide
    pub fn search_url(&self, query: &str, category: Category, limit: usize) -> String {
        let subreddits = self.tables.community_subsources(category);
        if subreddits.is_empty() {
            REDDIT.build_url(query, limit)
        } else {
            REDDIT_SUBREDDITS
                .build_url(query, limit)
                .replace("{subreddits}", &subreddits.join("+"))
        }
    }

    fn parse(body: &str, limit: usize) -> Result<Vec<RawHit>, AdapterError> {
        let listing: Listing = serde_json::from_str(body)
            .map_err(|e| AdapterError::Unavailable(format!("malformed Reddit response: {}", e)))?;

        Ok(listing
            .data
            .children
            .into_iter()
            .map(|c| c.data)
            .filter(|post| !post.title.trim().is_empty() && post.permalink.starts_with('/'))
            .take(limit)
            .map(|post| {
                let body = text::normalize_whitespace(&post.selftext);
                let snippet = if body.is_empty() {
                    format!("Discussion in r/{} ({} comments)", post.subreddit, post.num_comments)
                } else {
                    text::truncate_chars(&body, MAX_SNIPPET_CHARS)
                };

                let created = post
                    .created_utc
                    .and_then(|secs| DateTime::<Utc>::from_timestamp(secs as i64, 0));

                RawHit::new(
                    AdapterId::Community,
                    SourceType::Discussion,
                    text::normalize_whitespace(&post.title),
                    format!("https://www.reddit.com{}", post.permalink),
                )
                .with_snippet(snippet)
                .with_last_updated(created)
            })
            .collect())
    }
}

#[async_trait]
impl SourceAdapter for CommunityAdapter {
    fn id(&self) -> AdapterId {
        AdapterId::Community
    }

    fn provider(&self) -> &str {
        REDDIT.name
    }

    async fn fetch(
        &self,
        query: &str,
        category: Category,
        limit: usize,
    ) -> Result<Vec<RawHit>, AdapterError> {
        let shaped = refine_query(AdapterId::Community, query, category, &self.tables);
        let url = self.search_url(&shaped, category, limit);
        let body = self.http.get_text(&url, &[("Accept", "application/json")]).await?;
        let hits = Self::parse(&body, limit)?;

        debug!("Reddit returned {} hits for category {}", hits.len(), category);
        Ok(hits)
    }
}
