//! Request-scoped domain model
//!
//! Everything here lives for the duration of a single research call:
//! - `Query` as submitted by the caller
//! - `RawHit` produced by exactly one adapter
//! - `ScoredHit` owned copy of a hit plus its scores
//! - `ResearchResult` terminal record returned to the caller (and cached)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{text, Category, ScoreWeights, DEFAULT_MAX_SOURCES};

/// Identifier of a source adapter.
///
/// Declaration order is the adapter priority list: adapters are always
/// started in this order so that aggregation tie-breaks are reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterId {
    /// General web search (Brave API or DuckDuckGo HTML)
    Web,
    /// Encyclopedia search (Wikipedia)
    Encyclopedia,
    /// Community discussion search (Reddit)
    Community,
    /// Code hosting search (GitHub)
    Code,
}

impl AdapterId {
    /// All adapters in start priority order
    pub const PRIORITY: [AdapterId; 4] = [
        AdapterId::Web,
        AdapterId::Encyclopedia,
        AdapterId::Community,
        AdapterId::Code,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterId::Web => "web",
            AdapterId::Encyclopedia => "encyclopedia",
            AdapterId::Community => "community",
            AdapterId::Code => "code",
        }
    }

    /// Position in the priority list
    pub fn priority(&self) -> usize {
        Self::PRIORITY
            .iter()
            .position(|a| a == self)
            .unwrap_or(Self::PRIORITY.len())
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of source a hit came from; drives the credibility lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum SourceType {
    Web,
    News,
    Academic,
    Encyclopedia,
    Discussion,
    Code,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Web => "web",
            SourceType::News => "news",
            SourceType::Academic => "academic",
            SourceType::Encyclopedia => "encyclopedia",
            SourceType::Discussion => "discussion",
            SourceType::Code => "code",
        }
    }

    pub const ALL: [SourceType; 6] = [
        SourceType::Web,
        SourceType::News,
        SourceType::Academic,
        SourceType::Encyclopedia,
        SourceType::Discussion,
        SourceType::Code,
    ];
}

impl TryFrom<String> for SourceType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let needle = value.trim().to_lowercase();
        SourceType::ALL
            .iter()
            .copied()
            .find(|s| s.as_str() == needle)
            .ok_or_else(|| format!("unknown source type: {}", value))
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a request should be carried out, parsed from the `research_type` hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResearchMode {
    #[default]
    Comprehensive,
    /// Smaller per-adapter limit and fewer summary highlights
    Quick,
    /// Skip code search, lead with the encyclopedia
    Academic,
    /// Always include code search
    Technical,
}

impl ResearchMode {
    /// Parse a free-form hint. Unknown hints behave like `Comprehensive`.
    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint.map(|h| h.trim().to_lowercase()).as_deref() {
            Some("quick") => ResearchMode::Quick,
            Some("academic") => ResearchMode::Academic,
            Some("technical") => ResearchMode::Technical,
            _ => ResearchMode::Comprehensive,
        }
    }

    /// Per-adapter fetch limit for a requested maximum
    pub fn fetch_limit(&self, max_sources: usize) -> usize {
        match self {
            ResearchMode::Quick => max_sources.min(3),
            _ => max_sources,
        }
    }

    /// Number of hits the template summary highlights
    pub fn highlights(&self) -> usize {
        match self {
            ResearchMode::Quick => 3,
            _ => 5,
        }
    }
}

/// A research query as submitted by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Raw query text
    pub text: String,
    /// Upper bound on returned sources
    pub max_sources: usize,
    /// Optional research type hint
    pub research_type: Option<String>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            max_sources: DEFAULT_MAX_SOURCES,
            research_type: None,
        }
    }

    pub fn with_max_sources(mut self, max_sources: usize) -> Self {
        self.max_sources = max_sources;
        self
    }

    pub fn with_research_type(mut self, research_type: impl Into<String>) -> Self {
        self.research_type = Some(research_type.into());
        self
    }

    /// Lower-cased, whitespace-collapsed query text
    pub fn normalized_text(&self) -> String {
        text::normalize_query(&self.text)
    }

    pub fn mode(&self) -> ResearchMode {
        ResearchMode::from_hint(self.research_type.as_deref())
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// An unscored result from one adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    pub source_type: SourceType,
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub origin_adapter: AdapterId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl RawHit {
    pub fn new(
        origin_adapter: AdapterId,
        source_type: SourceType,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            source_type,
            title: title.into(),
            url: url.into(),
            snippet: String::new(),
            origin_adapter,
            last_updated: None,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    pub fn with_last_updated(mut self, last_updated: Option<DateTime<Utc>>) -> Self {
        self.last_updated = last_updated;
        self
    }

    /// URL key used for deduplication
    pub fn normalized_url(&self) -> String {
        text::normalize_url(&self.url)
    }
}

/// A hit with relevance and credibility attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHit {
    #[serde(flatten)]
    pub hit: RawHit,
    /// Query/term overlap, 0.0 - 1.0
    pub relevance_score: f64,
    /// Source authority, 0.0 - 1.0
    pub credibility_score: f64,
}

impl ScoredHit {
    pub fn new(hit: RawHit, relevance_score: f64, credibility_score: f64) -> Self {
        Self {
            hit,
            relevance_score: relevance_score.clamp(0.0, 1.0),
            credibility_score: credibility_score.clamp(0.0, 1.0),
        }
    }

    pub fn combined_score(&self, weights: &ScoreWeights) -> f64 {
        weights.combine(self.relevance_score, self.credibility_score)
    }
}

/// Stage of a research request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchState {
    Received,
    Classified,
    Fetching,
    Scoring,
    Aggregating,
    Summarizing,
    Done,
    Failed,
}

impl ResearchState {
    /// Successor in the happy path; terminal states return themselves
    pub fn next(&self) -> ResearchState {
        match self {
            ResearchState::Received => ResearchState::Classified,
            ResearchState::Classified => ResearchState::Fetching,
            ResearchState::Fetching => ResearchState::Scoring,
            ResearchState::Scoring => ResearchState::Aggregating,
            ResearchState::Aggregating => ResearchState::Summarizing,
            ResearchState::Summarizing => ResearchState::Done,
            ResearchState::Done => ResearchState::Done,
            ResearchState::Failed => ResearchState::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ResearchState::Done | ResearchState::Failed)
    }
}

/// Outcome of a single adapter invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterStatus {
    Ok,
    Empty,
    Failed,
    TimedOut,
    /// Still pending when the query deadline elapsed
    Skipped,
}

impl AdapterStatus {
    /// Whether the call returned without a transport error
    pub fn is_transport_ok(&self) -> bool {
        matches!(self, AdapterStatus::Ok | AdapterStatus::Empty)
    }
}

/// Per-adapter record attached to every result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterReport {
    pub adapter: AdapterId,
    pub status: AdapterStatus,
    pub hits: usize,
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Final record of one research request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub request_id: Uuid,
    pub query: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_type: Option<String>,
    pub success: bool,
    pub sources_found: usize,
    pub sources: Vec<ScoredHit>,
    pub summary: String,
    pub quality_score: f64,
    /// Wall-clock seconds from receipt to completion
    pub execution_time: f64,
    pub adapters: Vec<AdapterReport>,
    pub state: ResearchState,
    pub completed_at: DateTime<Utc>,
}

impl ResearchResult {
    /// A failed result: no sources, `success = false`
    pub fn failed(query: &Query, category: Category, reason: &str, execution_time: f64) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            query: query.text.clone(),
            category,
            research_type: query.research_type.clone(),
            success: false,
            sources_found: 0,
            sources: Vec::new(),
            summary: format!("Research for '{}' could not be completed: {}", query.text.trim(), reason),
            quality_score: 0.0,
            execution_time,
            adapters: Vec::new(),
            state: ResearchState::Failed,
            completed_at: Utc::now(),
        }
    }

    /// Distinct adapters that contributed at least one kept source
    pub fn contributing_adapters(&self) -> Vec<AdapterId> {
        let mut adapters: Vec<AdapterId> = self.sources.iter().map(|s| s.hit.origin_adapter).collect();
        adapters.sort();
        adapters.dedup();
        adapters
    }
}

/// Overall quality of a ranked source list.
///
/// `0.8 * mean(combined) + 0.2 * coverage`, where coverage saturates at five
/// sources. Rounded to three decimals; zero for an empty list.
pub fn quality_score(sources: &[ScoredHit], weights: &ScoreWeights) -> f64 {
    if sources.is_empty() {
        return 0.0;
    }

    let mean = sources.iter().map(|s| s.combined_score(weights)).sum::<f64>() / sources.len() as f64;
    let coverage = sources.len().min(5) as f64 / 5.0;
    let score = (0.8 * mean + 0.2 * coverage).clamp(0.0, 1.0);
    (score * 1000.0).round() / 1000.0
}
