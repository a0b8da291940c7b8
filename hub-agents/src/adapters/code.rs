//! Code search adapter (GitHub repository search)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hub_core::{text, AdapterId, Category, RawHit, SourceType, GITHUB};
use hub_net::HttpClient;
use serde::Deserialize;
use tracing::debug;

use crate::{keyword_query, AdapterError, SourceAdapter};

#[derive(Debug, Deserialize)]
struct GitHubSearchResponse {
    #[serde(default)]
    items: Vec<GitHubRepo>,
}

#[derive(Debug, Deserialize)]
struct GitHubRepo {
    full_name: String,
    html_url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// GitHub repository search; the token is optional
pub struct CodeSearchAdapter {
    http: HttpClient,
    token: Option<String>,
}

impl CodeSearchAdapter {
    pub fn new(http: HttpClient, token: Option<String>) -> Self {
        Self {
            http,
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    fn parse(body: &str, limit: usize) -> Result<Vec<RawHit>, AdapterError> {
        let response: GitHubSearchResponse = serde_json::from_str(body)
            .map_err(|e| AdapterError::Unavailable(format!("malformed GitHub response: {}", e)))?;

        Ok(response
            .items
            .into_iter()
            .take(limit)
            .map(|repo| {
                let mut snippet = text::normalize_whitespace(repo.description.as_deref().unwrap_or(""));
                let mut facts = vec![format!("{} stars", repo.stargazers_count)];
                if let Some(language) = repo.language.filter(|l| !l.is_empty()) {
                    facts.push(language);
                }
                if !snippet.is_empty() {
                    snippet.push(' ');
                }
                snippet.push_str(&format!("({})", facts.join(", ")));

                RawHit::new(AdapterId::Code, SourceType::Code, repo.full_name, repo.html_url)
                    .with_snippet(snippet)
                    .with_last_updated(repo.updated_at)
            })
            .collect())
    }
}

#[async_trait]
impl SourceAdapter for CodeSearchAdapter {
    fn id(&self) -> AdapterId {
        AdapterId::Code
    }

    fn provider(&self) -> &str {
        GITHUB.name
    }

    async fn fetch(
        &self,
        query: &str,
        category: Category,
        limit: usize,
    ) -> Result<Vec<RawHit>, AdapterError> {
        let shaped = keyword_query(query);
        let url = GITHUB.build_url(&shaped, limit);

        let auth = self.token.as_ref().map(|t| format!("Bearer {}", t));
        let mut headers = vec![
            ("Accept", "application/vnd.github+json"),
            ("X-GitHub-Api-Version", "2022-11-28"),
        ];
        if let Some(auth) = &auth {
            headers.push(("Authorization", auth.as_str()));
        }

        let body = self.http.get_text(&url, &headers).await?;
        let hits = Self::parse(&body, limit)?;

        debug!("GitHub returned {} repositories for {} query", hits.len(), category);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repositories() {
        let body = r#"{"total_count": 2, "incomplete_results": false, "items": [
            {"full_name": "qiskit/qiskit", "html_url": "https://github.com/Qiskit/qiskit",
             "description": "An open-source SDK for working with quantum computers",
             "stargazers_count": 5000, "language": "Python", "updated_at": "2024-06-01T00:00:00Z"},
            {"full_name": "someone/empty", "html_url": "https://github.com/someone/empty",
             "description": null, "stargazers_count": 1, "language": null}
        ]}"#;

        let hits = CodeSearchAdapter::parse(body, 10).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "qiskit/qiskit");
        assert_eq!(
            hits[0].snippet,
            "An open-source SDK for working with quantum computers (5000 stars, Python)"
        );
        assert_eq!(hits[0].source_type, SourceType::Code);
        assert!(hits[0].last_updated.is_some());
        assert_eq!(hits[1].snippet, "(1 stars)");
    }

    #[test]
    fn test_parse_rate_limit_body() {
        // GitHub's error body has no items
        let hits = CodeSearchAdapter::parse(r#"{"message": "API rate limit exceeded"}"#, 5).unwrap();
        assert!(hits.is_empty());
    }
}
