//! Scripted adapters for orchestrator and server tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hub_agents::{AdapterError, AdapterRegistry, FallbackSummarizer, SourceAdapter};
use hub_core::{AdapterId, Category, RawHit, ScoringTables, SourceType};

use crate::ResearchAgent;

pub fn hit(adapter: AdapterId, source_type: SourceType, title: &str, url: &str) -> RawHit {
    RawHit::new(adapter, source_type, title, url)
}

/// Adapter that returns canned hits after an optional delay
pub struct MockAdapter {
    id: AdapterId,
    hits: Vec<RawHit>,
    delay: Option<Duration>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockAdapter {
    pub fn new(id: AdapterId) -> Self {
        Self {
            id,
            hits: Vec::new(),
            delay: None,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_hits(mut self, hits: Vec<RawHit>) -> Self {
        self.hits = hits;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Shared call counter
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl SourceAdapter for MockAdapter {
    fn id(&self) -> AdapterId {
        self.id
    }

    fn provider(&self) -> &str {
        "mock"
    }

    async fn fetch(
        &self,
        _query: &str,
        _category: Category,
        _limit: usize,
    ) -> Result<Vec<RawHit>, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(AdapterError::Unavailable("mock outage".to_string()));
        }
        Ok(self.hits.clone())
    }
}

/// Agent over the embedded tables, the given adapters and template summaries
pub fn agent_with(adapters: Vec<MockAdapter>) -> ResearchAgent {
    let tables = Arc::new(ScoringTables::embedded().unwrap());
    let registry = adapters
        .into_iter()
        .fold(AdapterRegistry::new(), |registry, adapter| registry.with(Arc::new(adapter)));
    ResearchAgent::new(tables, registry, Arc::new(FallbackSummarizer::template_only()))
}
