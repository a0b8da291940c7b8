//! Errors that reach the caller of a research request

use thiserror::Error;

use crate::CacheError;

#[derive(Debug, Error)]
pub enum ResearchError {
    /// Empty or whitespace-only query; never retried
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The cache returned something unusable
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl ResearchError {
    /// Whether the error is the caller's fault (400) rather than ours (500)
    pub fn is_client_error(&self) -> bool {
        matches!(self, ResearchError::InvalidQuery(_))
    }
}
