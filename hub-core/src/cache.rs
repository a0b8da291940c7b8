//! Result cache collaborator
//!
//! The orchestrator only ever calls `get(key)` and `set(key, value, ttl)`;
//! staleness and eviction belong to the cache. Two implementations ship:
//! - `MemoryCache`: process-local, TTL checked on read and swept on write
//! - `FileCache`: one JSON file per key under a directory

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::ResearchResult;

/// Errors from a cache backend
#[derive(Debug, Error)]
pub enum CacheError {
    /// Stored payload could not be decoded
    #[error("Corrupt cache entry for {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value cache for research results
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Backend name for status reporting
    fn name(&self) -> &str;

    async fn get(&self, key: &str) -> Result<Option<ResearchResult>, CacheError>;

    /// Store a result; a zero TTL never expires
    async fn set(&self, key: &str, value: &ResearchResult, ttl: Duration) -> Result<(), CacheError>;
}

/// Thread-safe reference to a cache backend
pub type SharedCache = Arc<dyn ResultCache>;

/// Cache key for `(normalized query, max_sources, research_type)`
pub fn cache_key(normalized_query: &str, max_sources: usize, research_type: Option<&str>) -> String {
    let research_type = research_type
        .map(|r| r.trim().to_lowercase())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "-".to_string());

    let mut hasher = Sha256::new();
    hasher.update(normalized_query.as_bytes());
    hasher.update([0u8]);
    hasher.update(max_sources.to_string().as_bytes());
    hasher.update([0u8]);
    hasher.update(research_type.as_bytes());
    format!("research:{:x}", hasher.finalize())
}

fn is_expired(stored_at: DateTime<Utc>, ttl_secs: u64, now: DateTime<Utc>) -> bool {
    ttl_secs > 0 && (now - stored_at).num_seconds() >= ttl_secs as i64
}

/// Writes between sweeps of expired entries
pub const SWEEP_EVERY: u64 = 64;

/// Default upper bound on memory cache entries
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Debug, Clone)]
struct MemoryEntry {
    payload: String,
    stored_at: DateTime<Utc>,
    ttl_secs: u64,
    /// Insertion order, used for oldest-first eviction
    seq: u64,
}

/// In-memory TTL cache.
///
/// Expired entries are dropped on read and swept every `SWEEP_EVERY` writes.
/// Above `max_entries` the oldest entries are evicted.
#[derive(Debug)]
pub struct MemoryCache {
    entries: DashMap<String, MemoryEntry>,
    max_entries: usize,
    writes: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
    evicted: AtomicU64,
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub evicted: u64,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
            writes: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expired: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
        }
    }

    /// Store an already-serialized payload as-is
    pub fn put_raw(&self, key: &str, payload: impl Into<String>, ttl: Duration) {
        let seq = self.writes.fetch_add(1, Ordering::Relaxed) + 1;
        self.entries.insert(
            key.to_string(),
            MemoryEntry {
                payload: payload.into(),
                stored_at: Utc::now(),
                ttl_secs: ttl.as_secs(),
                seq,
            },
        );

        if seq % SWEEP_EVERY == 0 || self.entries.len() > self.max_entries {
            self.purge_expired();
        }
        if self.entries.len() > self.max_entries {
            self.evict_oldest();
        }
    }

    /// Drop expired entries, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !is_expired(entry.stored_at, entry.ttl_secs, now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!("Swept {} expired cache entries", removed);
        }
        self.expired.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    fn evict_oldest(&self) {
        let excess = self.entries.len().saturating_sub(self.max_entries);
        if excess == 0 {
            return;
        }

        let mut order: Vec<(u64, String)> = self
            .entries
            .iter()
            .map(|e| (e.value().seq, e.key().clone()))
            .collect();
        order.sort_unstable();

        for (_, key) in order.into_iter().take(excess) {
            self.entries.remove(&key);
        }
        self.evicted.fetch_add(excess as u64, Ordering::Relaxed);
        debug!("Evicted {} cache entries over the {} cap", excess, self.max_entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<ResearchResult>, CacheError> {
        let entry = match self.entries.get(key) {
            Some(entry) => entry.clone(),
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return Ok(None);
            }
        };

        if is_expired(entry.stored_at, entry.ttl_secs, Utc::now()) {
            self.entries.remove(key);
            self.expired.fetch_add(1, Ordering::Relaxed);
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("Cache entry {} expired", key);
            return Ok(None);
        }

        let result = serde_json::from_str(&entry.payload).map_err(|e| CacheError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        self.hits.fetch_add(1, Ordering::Relaxed);
        Ok(Some(result))
    }

    async fn set(&self, key: &str, value: &ResearchResult, ttl: Duration) -> Result<(), CacheError> {
        let payload = serde_json::to_string(value)?;
        self.put_raw(key, payload, ttl);
        Ok(())
    }
}

/// On-disk entry
#[derive(Debug, Serialize, Deserialize)]
struct FileEntry {
    stored_at: DateTime<Utc>,
    ttl_secs: u64,
    data: ResearchResult,
}

/// JSON-file cache, one file per key
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

#[async_trait]
impl ResultCache for FileCache {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<ResearchResult>, CacheError> {
        let path = self.path_for(key);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entry: FileEntry = serde_json::from_str(&content).map_err(|e| CacheError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        if is_expired(entry.stored_at, entry.ttl_secs, Utc::now()) {
            let _ = fs::remove_file(&path).await;
            debug!("Cache file {} expired", path.display());
            return Ok(None);
        }

        Ok(Some(entry.data))
    }

    async fn set(&self, key: &str, value: &ResearchResult, ttl: Duration) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).await?;

        let entry = FileEntry {
            stored_at: Utc::now(),
            ttl_secs: ttl.as_secs(),
            data: value.clone(),
        };

        let content = serde_json::to_string_pretty(&entry)?;
        fs::write(self.path_for(key), content).await?;
        Ok(())
    }
}
