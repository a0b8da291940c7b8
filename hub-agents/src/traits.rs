//! Common traits for source adapters

use async_trait::async_trait;
use hub_core::{AdapterId, Category, RawHit};
use hub_net::FetchError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors from a single adapter call
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Provider unreachable, non-success status or unreadable response
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl From<FetchError> for AdapterError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout(secs) => AdapterError::Timeout(Duration::from_secs(secs)),
            other => AdapterError::Unavailable(other.to_string()),
        }
    }
}

/// Common interface for all source adapters
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Adapter identifier
    fn id(&self) -> AdapterId;

    /// Name of the provider currently in use
    fn provider(&self) -> &str;

    /// Fetch at most `limit` hits for a query
    async fn fetch(
        &self,
        query: &str,
        category: Category,
        limit: usize,
    ) -> Result<Vec<RawHit>, AdapterError>;
}

/// Thread-safe reference to an adapter
pub type SharedAdapter = Arc<dyn SourceAdapter>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_mapping() {
        assert!(matches!(
            AdapterError::from(FetchError::Timeout(8)),
            AdapterError::Timeout(d) if d == Duration::from_secs(8)
        ));
        assert!(matches!(
            AdapterError::from(FetchError::Status(503)),
            AdapterError::Unavailable(msg) if msg.contains("503")
        ));
    }

    #[test]
    fn test_timeout_message_keeps_subsecond_value() {
        let err = AdapterError::Timeout(Duration::from_millis(100));
        assert_eq!(err.to_string(), "Timed out after 100ms");
        assert_eq!(
            AdapterError::Timeout(Duration::from_secs(8)).to_string(),
            "Timed out after 8s"
        );
    }
}
