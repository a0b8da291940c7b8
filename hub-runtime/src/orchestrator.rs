//! Research Orchestrator
//!
//! Drives one request through the pipeline:
//! Received → Classified → Fetching → Scoring → Aggregating → Summarizing → Done
//!
//! Adapter and summarizer failures degrade the result instead of failing it.
//! Only an empty query (error to the caller) and an unreadable cache entry
//! (`Failed` result) end a request early.

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use hub_agents::{
    AdapterError, AdapterRegistry, Aggregator, QualityScorer, SharedSummarizer, TemplateSummarizer,
};
use hub_core::{
    cache_key, clamp_max_sources, quality_score, AdapterId, AdapterReport, AdapterStatus, Category,
    Query, RawHit, ResearchError, ResearchResult, ResearchState, ScoringTables, SharedCache,
    TopicClassifier, DEFAULT_MAX_SOURCES, MAX_SOURCES_CAP,
};

/// Orchestrator limits
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Bounded wait for a single adapter
    pub adapter_timeout: Duration,
    /// Overall fan-in deadline per query
    pub query_timeout: Duration,
    /// TTL for cached results; zero never expires
    pub cache_ttl: Duration,
    /// Upper bound on `max_sources`
    pub max_sources_cap: usize,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            adapter_timeout: Duration::from_secs(8),
            query_timeout: Duration::from_secs(20),
            cache_ttl: Duration::from_secs(3600),
            max_sources_cap: MAX_SOURCES_CAP,
        }
    }
}

/// One adapter's outcome, in start order
type AdapterOutcome = (AdapterReport, Vec<RawHit>);

/// Capability descriptor served by `/status`
#[derive(Debug, Clone, Serialize)]
pub struct StatusDescriptor {
    pub name: String,
    pub version: String,
    pub uptime_secs: u64,
    pub adapters: Vec<AdapterDescriptor>,
    pub categories: Vec<Category>,
    pub summarizer: String,
    pub cache: Option<String>,
    pub defaults: DefaultsDescriptor,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdapterDescriptor {
    pub id: AdapterId,
    pub provider: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DefaultsDescriptor {
    pub max_sources: usize,
    pub max_sources_cap: usize,
    pub adapter_timeout_secs: f64,
    pub query_timeout_secs: f64,
}

/// The research agent: classifier, adapters, scorer, aggregator, summarizer
pub struct ResearchAgent {
    classifier: TopicClassifier,
    registry: AdapterRegistry,
    scorer: QualityScorer,
    aggregator: Aggregator,
    summarizer: SharedSummarizer,
    template: TemplateSummarizer,
    cache: Option<SharedCache>,
    settings: OrchestratorSettings,
}

impl ResearchAgent {
    pub fn new(
        tables: Arc<ScoringTables>,
        registry: AdapterRegistry,
        summarizer: SharedSummarizer,
    ) -> Self {
        Self {
            classifier: TopicClassifier::new(tables.clone()),
            aggregator: Aggregator::new(tables.weights),
            scorer: QualityScorer::new(tables),
            registry,
            summarizer,
            template: TemplateSummarizer::default(),
            cache: None,
            settings: OrchestratorSettings::default(),
        }
    }

    pub fn with_cache(mut self, cache: SharedCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_settings(mut self, settings: OrchestratorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Capability descriptor
    pub fn describe(&self, uptime: Duration) -> StatusDescriptor {
        StatusDescriptor {
            name: "research-hub".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: uptime.as_secs(),
            adapters: self
                .registry
                .describe()
                .into_iter()
                .map(|(id, provider)| AdapterDescriptor { id, provider })
                .collect(),
            categories: Category::ALL.to_vec(),
            summarizer: self.summarizer.name().to_string(),
            cache: self.cache.as_ref().map(|c| c.name().to_string()),
            defaults: DefaultsDescriptor {
                max_sources: DEFAULT_MAX_SOURCES,
                max_sources_cap: self.settings.max_sources_cap,
                adapter_timeout_secs: self.settings.adapter_timeout.as_secs_f64(),
                query_timeout_secs: self.settings.query_timeout.as_secs_f64(),
            },
        }
    }

    /// Run one research request.
    ///
    /// Errors only on an empty query; every other failure is reported in the
    /// returned result.
    pub async fn research(&self, query: Query) -> Result<ResearchResult, ResearchError> {
        let started = Instant::now();
        let mut state = ResearchState::Received;

        if query.is_blank() {
            return Err(ResearchError::InvalidQuery("query must not be empty".to_string()));
        }

        let max_sources = clamp_max_sources(Some(query.max_sources), self.settings.max_sources_cap);
        let query = query.with_max_sources(max_sources);
        let mode = query.mode();

        let classification = self.classifier.classify_detailed(&query.text)?;
        let category = classification.category;
        state = advance(state, ResearchState::Classified);
        info!(
            "Classified '{}' as {} (keywords: {:?})",
            query.text.trim(),
            category,
            classification.matched_keywords
        );

        let key = cache_key(&query.normalized_text(), max_sources, query.research_type.as_deref());
        if let Some(cache) = &self.cache {
            match cache.get(&key).await {
                Ok(Some(cached)) => {
                    info!("Cache hit for '{}' ({})", query.text.trim(), cache.name());
                    return Ok(cached);
                }
                Ok(None) => debug!("Cache miss for {}", key),
                Err(e) => {
                    error!("Cache read failed for {}: {}", key, e);
                    let reason = format!("cache read failed: {}", e);
                    return Ok(ResearchResult::failed(
                        &query,
                        category,
                        &reason,
                        elapsed_secs(started),
                    ));
                }
            }
        }

        state = advance(state, ResearchState::Fetching);
        let adapters = category.adapters(mode);
        let limit = mode.fetch_limit(max_sources);
        let outcomes = self.fetch_all(&query, category, &adapters, limit).await;

        state = advance(state, ResearchState::Scoring);
        let mut reports = Vec::with_capacity(outcomes.len());
        let mut scored = Vec::new();
        for (report, hits) in outcomes {
            scored.extend(self.scorer.score_all(&hits, category, &query.text));
            reports.push(report);
        }

        state = advance(state, ResearchState::Aggregating);
        let sources = self.aggregator.aggregate(scored, max_sources);

        state = advance(state, ResearchState::Summarizing);
        let summary = match self.summarizer.summarize(&query, category, &sources).await {
            Ok(summary) if !summary.trim().is_empty() => summary,
            Ok(_) => self.template.render(&query, category, &sources),
            Err(e) => {
                warn!("Summarizer {} failed: {}", self.summarizer.name(), e);
                self.template.render(&query, category, &sources)
            }
        };

        state = advance(state, ResearchState::Done);
        let success = reports.iter().any(|r| r.status.is_transport_ok());
        let result = ResearchResult {
            request_id: Uuid::new_v4(),
            query: query.text.clone(),
            category,
            research_type: query.research_type.clone(),
            success,
            sources_found: sources.len(),
            quality_score: quality_score(&sources, &self.scorer.tables().weights),
            sources,
            summary,
            execution_time: elapsed_secs(started),
            adapters: reports,
            state,
            completed_at: chrono::Utc::now(),
        };

        info!(
            "Research complete: {} sources, quality {:.3}, {:.2}s",
            result.sources_found, result.quality_score, result.execution_time
        );

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(&key, &result, self.settings.cache_ttl).await {
                warn!("Cache write failed for {}: {}", key, e);
            }
        }

        Ok(result)
    }

    /// Start every adapter in priority order and collect outcomes until all
    /// finish or the query deadline elapses.
    async fn fetch_all(
        &self,
        query: &Query,
        category: Category,
        adapters: &[AdapterId],
        limit: usize,
    ) -> Vec<AdapterOutcome> {
        let mut slots: Vec<Option<AdapterOutcome>> = (0..adapters.len()).map(|_| None).collect();
        let mut pending = FuturesUnordered::new();

        for (index, id) in adapters.iter().copied().enumerate() {
            let Some(adapter) = self.registry.get(id) else {
                debug!("Adapter {} is not configured", id);
                let skipped = report(
                    id,
                    AdapterStatus::Skipped,
                    0,
                    Duration::ZERO,
                    Some("adapter not configured".to_string()),
                );
                slots[index] = Some((skipped, Vec::new()));
                continue;
            };

            let text = query.text.clone();
            let timeout = self.settings.adapter_timeout;
            debug!("Starting adapter {} ({})", id, adapter.provider());
            pending.push(async move {
                let started = Instant::now();
                let outcome = tokio::time::timeout(timeout, adapter.fetch(&text, category, limit)).await;
                (index, id, started.elapsed(), outcome)
            });
        }

        let deadline = tokio::time::sleep(self.settings.query_timeout);
        tokio::pin!(deadline);

        while !pending.is_empty() {
            tokio::select! {
                Some((index, id, elapsed, outcome)) = pending.next() => {
                    let outcome = match outcome {
                        Ok(result) => result,
                        Err(_) => Err(AdapterError::Timeout(self.settings.adapter_timeout)),
                    };
                    slots[index] = Some(record(id, elapsed, outcome, limit));
                }
                _ = &mut deadline => {
                    warn!(
                        "Query deadline of {:?} elapsed with {} adapter(s) pending",
                        self.settings.query_timeout,
                        pending.len()
                    );
                    break;
                }
            }
        }
        drop(pending);

        adapters
            .iter()
            .zip(slots)
            .map(|(id, slot)| {
                slot.unwrap_or_else(|| {
                    (
                        report(
                            *id,
                            AdapterStatus::Skipped,
                            0,
                            self.settings.query_timeout,
                            Some("query deadline elapsed".to_string()),
                        ),
                        Vec::new(),
                    )
                })
            })
            .collect()
    }
}

fn advance(current: ResearchState, expected: ResearchState) -> ResearchState {
    let next = current.next();
    debug_assert_eq!(next, expected);
    debug!("State: {:?} -> {:?}", current, next);
    next
}

fn elapsed_secs(started: Instant) -> f64 {
    (started.elapsed().as_secs_f64() * 1000.0).round() / 1000.0
}

fn report(
    adapter: AdapterId,
    status: AdapterStatus,
    hits: usize,
    elapsed: Duration,
    error: Option<String>,
) -> AdapterReport {
    AdapterReport {
        adapter,
        status,
        hits,
        elapsed_ms: elapsed.as_millis() as u64,
        error,
    }
}

/// Turn an adapter result into a report plus its hits
fn record(
    id: AdapterId,
    elapsed: Duration,
    outcome: Result<Vec<RawHit>, AdapterError>,
    limit: usize,
) -> AdapterOutcome {
    match outcome {
        Ok(mut hits) => {
            hits.truncate(limit);
            let status = if hits.is_empty() {
                AdapterStatus::Empty
            } else {
                AdapterStatus::Ok
            };
            debug!("Adapter {} returned {} hits in {:?}", id, hits.len(), elapsed);
            (report(id, status, hits.len(), elapsed, None), hits)
        }
        Err(e) => {
            warn!("Adapter {} failed: {}", id, e);
            let status = match e {
                AdapterError::Timeout(_) => AdapterStatus::TimedOut,
                AdapterError::Unavailable(_) => AdapterStatus::Failed,
            };
            (report(id, status, 0, elapsed, Some(e.to_string())), Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{agent_with, hit, MockAdapter};
    use hub_core::{MemoryCache, ResultCache, ScoredHit, SourceType};
    use std::collections::HashSet;

    fn settings(adapter_ms: u64, query_ms: u64) -> OrchestratorSettings {
        OrchestratorSettings {
            adapter_timeout: Duration::from_millis(adapter_ms),
            query_timeout: Duration::from_millis(query_ms),
            ..OrchestratorSettings::default()
        }
    }

    fn four_adapters() -> Vec<MockAdapter> {
        vec![
            MockAdapter::new(AdapterId::Web).with_hits(vec![
                hit(AdapterId::Web, SourceType::Web, "Quantum computing breakthroughs in 2024", "https://a.example/1"),
                hit(AdapterId::Web, SourceType::News, "Chip news", "https://b.example/2"),
                hit(AdapterId::Web, SourceType::Web, "Quantum error correction", "https://c.example/3"),
            ]),
            MockAdapter::new(AdapterId::Encyclopedia).with_hits(vec![
                hit(AdapterId::Encyclopedia, SourceType::Encyclopedia, "Quantum computing", "https://en.wikipedia.org/wiki/Quantum_computing"),
                hit(AdapterId::Encyclopedia, SourceType::Encyclopedia, "Qubit", "https://en.wikipedia.org/wiki/Qubit"),
            ]),
            MockAdapter::new(AdapterId::Community).with_hits(vec![
                hit(AdapterId::Community, SourceType::Discussion, "Are quantum computing breakthroughs real?", "https://www.reddit.com/r/x/1"),
            ]),
            MockAdapter::new(AdapterId::Code).with_hits(vec![
                hit(AdapterId::Code, SourceType::Code, "qiskit/qiskit", "https://github.com/Qiskit/qiskit"),
                hit(AdapterId::Code, SourceType::Code, "quantumlib/Cirq", "https://github.com/quantumlib/Cirq"),
            ]),
        ]
    }

    fn is_sorted(sources: &[ScoredHit]) -> bool {
        let weights = hub_core::ScoreWeights::default();
        sources
            .windows(2)
            .all(|w| w[0].combined_score(&weights) >= w[1].combined_score(&weights))
    }

    #[tokio::test]
    async fn test_four_adapters_ranked_and_truncated() {
        let mocks = four_adapters();
        let counters: Vec<_> = mocks.iter().map(|m| m.calls()).collect();
        let agent = agent_with(mocks).with_settings(settings(1000, 2000));

        let result = agent
            .research(Query::new("quantum computing breakthroughs").with_max_sources(5))
            .await
            .unwrap();

        assert_eq!(result.state, ResearchState::Done);
        assert_eq!(result.category, Category::Technology);
        assert!(result.success);
        assert_eq!(result.sources.len(), 5);
        assert_eq!(result.sources_found, result.sources.len());
        assert!(is_sorted(&result.sources));
        assert_eq!(result.adapters.len(), 4);
        assert!(counters.iter().all(|c| c.load(std::sync::atomic::Ordering::SeqCst) == 1));
        assert!(!result.summary.is_empty());
        assert!(result.quality_score > 0.0 && result.quality_score <= 1.0);
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let agent = agent_with(four_adapters()).with_settings(settings(1000, 2000));
        let query = || Query::new("quantum computing breakthroughs").with_max_sources(6);

        let first = agent.research(query()).await.unwrap();
        let second = agent.research(query()).await.unwrap();

        let ranked = |r: &ResearchResult| -> Vec<(String, f64, f64)> {
            r.sources
                .iter()
                .map(|s| (s.hit.url.clone(), s.relevance_score, s.credibility_score))
                .collect()
        };
        assert_eq!(ranked(&first), ranked(&second));
        assert_eq!(first.quality_score, second.quality_score);
        assert_eq!(first.category, second.category);
        assert_eq!(first.summary, second.summary);
        assert_ne!(first.request_id, second.request_id);
    }

    #[tokio::test]
    async fn test_empty_query_rejected_without_adapter_calls() {
        let mocks = four_adapters();
        let counters: Vec<_> = mocks.iter().map(|m| m.calls()).collect();
        let agent = agent_with(mocks);

        for text in ["", "   \n\t"] {
            let err = agent.research(Query::new(text)).await.unwrap_err();
            assert!(matches!(err, ResearchError::InvalidQuery(_)));
        }
        assert!(counters.iter().all(|c| c.load(std::sync::atomic::Ordering::SeqCst) == 0));
    }

    #[tokio::test]
    async fn test_duplicate_urls_keep_higher_relevance() {
        let agent = agent_with(vec![
            MockAdapter::new(AdapterId::Web).with_hits(vec![hit(
                AdapterId::Web,
                SourceType::Web,
                "Unrelated page",
                "https://en.wikipedia.org/wiki/X",
            )]),
            MockAdapter::new(AdapterId::Encyclopedia).with_hits(vec![hit(
                AdapterId::Encyclopedia,
                SourceType::Encyclopedia,
                "Quantum computing explained",
                "HTTPS://EN.WIKIPEDIA.ORG/wiki/X/",
            )]),
        ]);

        let result = agent.research(Query::new("quantum computing")).await.unwrap();
        assert_eq!(result.sources_found, 1);
        assert_eq!(result.sources[0].hit.origin_adapter, AdapterId::Encyclopedia);
        assert_eq!(result.sources[0].hit.title, "Quantum computing explained");
    }

    #[tokio::test]
    async fn test_cached_result_skips_adapters() {
        let mocks = four_adapters();
        let counters: Vec<_> = mocks.iter().map(|m| m.calls()).collect();
        let cache = Arc::new(MemoryCache::new());

        let mut cached = ResearchResult::failed(&Query::new("ev benefits"), Category::Automotive, "n/a", 0.5);
        cached.state = ResearchState::Done;
        cached.success = true;
        cached.summary = "cached summary".to_string();
        cache
            .set(&cache_key("ev benefits", 10, None), &cached, Duration::from_secs(60))
            .await
            .unwrap();

        let agent = agent_with(mocks).with_cache(cache);
        let result = agent.research(Query::new("  EV   benefits ")).await.unwrap();

        assert_eq!(result.summary, "cached summary");
        assert_eq!(result.request_id, cached.request_id);
        assert!(counters.iter().all(|c| c.load(std::sync::atomic::Ordering::SeqCst) == 0));
    }

    #[tokio::test]
    async fn test_done_results_are_cached() {
        let mocks = four_adapters();
        let counters: Vec<_> = mocks.iter().map(|m| m.calls()).collect();
        let cache = Arc::new(MemoryCache::new());
        let agent = agent_with(mocks).with_cache(cache.clone());

        let first = agent.research(Query::new("quantum computing")).await.unwrap();
        let second = agent.research(Query::new("Quantum Computing")).await.unwrap();

        assert_eq!(first.request_id, second.request_id);
        assert_eq!(first.sources_found, second.sources_found);
        assert_eq!(cache.len(), 1);
        assert!(counters.iter().all(|c| c.load(std::sync::atomic::Ordering::SeqCst) == 1));

        // Different research type is a different key
        agent
            .research(Query::new("quantum computing").with_research_type("quick"))
            .await
            .unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_slow_adapter_times_out() {
        let agent = agent_with(vec![
            MockAdapter::new(AdapterId::Web)
                .with_hits(vec![hit(AdapterId::Web, SourceType::Web, "Slow", "https://slow.example")])
                .with_delay(Duration::from_secs(5)),
            MockAdapter::new(AdapterId::Encyclopedia)
                .with_hits(vec![hit(AdapterId::Encyclopedia, SourceType::Encyclopedia, "Quantum", "https://e.example")]),
            MockAdapter::new(AdapterId::Community)
                .with_hits(vec![hit(AdapterId::Community, SourceType::Discussion, "Quantum talk", "https://c.example")]),
            MockAdapter::new(AdapterId::Code)
                .with_hits(vec![hit(AdapterId::Code, SourceType::Code, "quantum/lib", "https://g.example")]),
        ])
        .with_settings(settings(100, 3000));

        let result = agent.research(Query::new("quantum computing")).await.unwrap();

        assert_eq!(result.state, ResearchState::Done);
        assert!(result.success);
        assert_eq!(result.sources_found, 3);
        assert!(result.sources.iter().all(|s| s.hit.origin_adapter != AdapterId::Web));
        assert_eq!(result.adapters[0].adapter, AdapterId::Web);
        assert_eq!(result.adapters[0].status, AdapterStatus::TimedOut);
        assert_eq!(result.adapters[0].error.as_deref(), Some("Timed out after 100ms"));
        assert!(result.execution_time >= 0.1);
        assert!(result.execution_time < 3.0);
    }

    #[tokio::test]
    async fn test_query_deadline_skips_pending_adapters() {
        let agent = agent_with(vec![
            MockAdapter::new(AdapterId::Web)
                .with_hits(vec![hit(AdapterId::Web, SourceType::Web, "Fast", "https://fast.example")]),
            MockAdapter::new(AdapterId::Encyclopedia)
                .with_hits(vec![hit(AdapterId::Encyclopedia, SourceType::Encyclopedia, "Late", "https://late.example")])
                .with_delay(Duration::from_secs(5)),
        ])
        .with_settings(settings(10_000, 150));

        let result = agent.research(Query::new("history of rome")).await.unwrap();

        assert_eq!(result.sources_found, 1);
        assert_eq!(result.adapters[0].status, AdapterStatus::Ok);
        assert_eq!(result.adapters[1].status, AdapterStatus::Skipped);
        // Community is mapped for this category but not registered
        assert_eq!(result.adapters[2].adapter, AdapterId::Community);
        assert_eq!(result.adapters[2].status, AdapterStatus::Skipped);
    }

    #[tokio::test]
    async fn test_all_adapters_failing() {
        let agent = agent_with(vec![
            MockAdapter::new(AdapterId::Web).failing(),
            MockAdapter::new(AdapterId::Encyclopedia).failing(),
            MockAdapter::new(AdapterId::Community).failing(),
        ]);

        let result = agent.research(Query::new("best pasta recipes")).await.unwrap();

        assert_eq!(result.state, ResearchState::Done);
        assert!(!result.success);
        assert_eq!(result.sources_found, 0);
        assert!(result.sources.is_empty());
        assert!(!result.summary.is_empty());
        assert_eq!(result.quality_score, 0.0);
        assert!(result.adapters.iter().all(|r| r.status == AdapterStatus::Failed));
    }

    #[tokio::test]
    async fn test_empty_but_reachable_is_success() {
        let agent = agent_with(vec![MockAdapter::new(AdapterId::Web)]);
        let result = agent.research(Query::new("zxqv plorb")).await.unwrap();
        assert!(result.success);
        assert_eq!(result.sources_found, 0);
        assert_eq!(result.adapters[0].status, AdapterStatus::Empty);
    }

    #[tokio::test]
    async fn test_corrupt_cache_fails_request() {
        let cache = Arc::new(MemoryCache::new());
        cache.put_raw(&cache_key("ev benefits", 10, None), "{broken", Duration::from_secs(60));

        let mocks = four_adapters();
        let counters: Vec<_> = mocks.iter().map(|m| m.calls()).collect();
        let agent = agent_with(mocks).with_cache(cache);

        let result = agent.research(Query::new("ev benefits")).await.unwrap();
        assert_eq!(result.state, ResearchState::Failed);
        assert!(!result.success);
        assert!(result.sources.is_empty());
        assert!(result.summary.contains("cache read failed"));
        assert!(counters.iter().all(|c| c.load(std::sync::atomic::Ordering::SeqCst) == 0));
    }

    #[tokio::test]
    async fn test_max_sources_clamped() {
        let hits: Vec<RawHit> = (0..80)
            .map(|i| hit(AdapterId::Web, SourceType::Web, "Quantum", &format!("https://q.example/{}", i)))
            .collect();
        let agent = agent_with(vec![MockAdapter::new(AdapterId::Web).with_hits(hits)]);

        let result = agent
            .research(Query::new("quantum").with_max_sources(500))
            .await
            .unwrap();
        assert_eq!(result.sources_found, MAX_SOURCES_CAP);

        let urls: HashSet<String> = result.sources.iter().map(|s| s.hit.normalized_url()).collect();
        assert_eq!(urls.len(), result.sources_found);

        let result = agent.research(Query::new("quantum").with_max_sources(0)).await.unwrap();
        assert_eq!(result.sources_found, 1);
    }

    #[tokio::test]
    async fn test_quick_mode_limits_fetch() {
        let hits: Vec<RawHit> = (0..10)
            .map(|i| hit(AdapterId::Web, SourceType::Web, "Quantum", &format!("https://q.example/{}", i)))
            .collect();
        let agent = agent_with(vec![MockAdapter::new(AdapterId::Web).with_hits(hits)]);

        let result = agent
            .research(Query::new("quantum").with_research_type("quick"))
            .await
            .unwrap();
        assert_eq!(result.sources_found, 3);
        assert_eq!(result.research_type.as_deref(), Some("quick"));
    }

    #[tokio::test]
    async fn test_describe() {
        let agent = agent_with(four_adapters());
        let status = agent.describe(Duration::from_secs(42));
        assert_eq!(status.name, "research-hub");
        assert_eq!(status.uptime_secs, 42);
        assert_eq!(status.adapters.len(), 4);
        assert_eq!(status.categories.len(), 15);
        assert_eq!(status.summarizer, "template");
        assert!(status.cache.is_none());
        assert_eq!(status.defaults.max_sources, 10);
    }
}
