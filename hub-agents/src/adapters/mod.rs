//! Source adapters
//!
//! One adapter per external source family:
//! - **web**: Brave Search API when keyed, DuckDuckGo HTML otherwise
//! - **encyclopedia**: Wikipedia search API
//! - **community**: Reddit search, per-category subreddits
//! - **code**: GitHub repository search

mod code;
mod community;
mod encyclopedia;
mod web;

pub use code::CodeSearchAdapter;
pub use community::CommunityAdapter;
pub use encyclopedia::EncyclopediaAdapter;
pub use web::WebSearchAdapter;

use hub_core::{AdapterId, ScoringTables};
use hub_net::{FetchError, HttpClient, HttpConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::SharedAdapter;

/// Adapter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterSettings {
    /// Transport settings shared by every adapter
    pub http: HttpConfig,
    /// Brave Search API key; DuckDuckGo is used without one
    #[serde(skip_serializing)]
    pub brave_api_key: Option<String>,
    /// GitHub token (optional, raises rate limits)
    #[serde(skip_serializing)]
    pub github_token: Option<String>,
    /// Adapters left out of the registry
    pub disabled: Vec<AdapterId>,
}

/// Adapters available to the orchestrator, keyed by id
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: BTreeMap<AdapterId, SharedAdapter>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the network-backed adapter set
    pub fn from_settings(
        settings: &AdapterSettings,
        tables: Arc<ScoringTables>,
    ) -> Result<Self, FetchError> {
        let mut registry = Self::new();

        for id in AdapterId::PRIORITY {
            if settings.disabled.contains(&id) {
                continue;
            }

            let http = HttpClient::new(settings.http.clone())?;
            let adapter: SharedAdapter = match id {
                AdapterId::Web => Arc::new(WebSearchAdapter::new(
                    http,
                    tables.clone(),
                    settings.brave_api_key.clone(),
                )),
                AdapterId::Encyclopedia => Arc::new(EncyclopediaAdapter::new(http)),
                AdapterId::Community => Arc::new(CommunityAdapter::new(http, tables.clone())),
                AdapterId::Code => {
                    Arc::new(CodeSearchAdapter::new(http, settings.github_token.clone()))
                }
            };
            registry.register(adapter);
        }

        Ok(registry)
    }

    /// Add or replace an adapter
    pub fn register(&mut self, adapter: SharedAdapter) {
        self.adapters.insert(adapter.id(), adapter);
    }

    pub fn with(mut self, adapter: SharedAdapter) -> Self {
        self.register(adapter);
        self
    }

    pub fn get(&self, id: AdapterId) -> Option<SharedAdapter> {
        self.adapters.get(&id).cloned()
    }

    /// Registered adapters in priority order
    pub fn ids(&self) -> Vec<AdapterId> {
        self.adapters.keys().copied().collect()
    }

    /// `(adapter id, provider name)` pairs in priority order
    pub fn describe(&self) -> Vec<(AdapterId, String)> {
        self.adapters
            .iter()
            .map(|(id, adapter)| (*id, adapter.provider().to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
