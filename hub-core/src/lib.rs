//! Research Hub Core - domain model and static tables for research aggregation
//!
//! This crate provides the foundational primitives:
//! - Query, hit and result types shared by every stage
//! - Topic categories and the keyword classifier
//! - Scoring tables (keywords, authority weights, adapter hints)
//! - Search provider registry
//! - Result cache contract with memory and file backends

pub mod cache;
pub mod category;
pub mod classifier;
pub mod error;
pub mod model;
pub mod providers;
pub mod tables;
pub mod text;

pub use cache::*;
pub use category::*;
pub use classifier::*;
pub use error::*;
pub use model::*;
pub use providers::*;
pub use tables::*;

/// Sources returned when the caller does not ask for a number
pub const DEFAULT_MAX_SOURCES: usize = 10;

/// Upper bound on requested sources
pub const MAX_SOURCES_CAP: usize = 50;

/// Credibility for (source type, category) pairs missing from the tables
pub const BASELINE_CREDIBILITY: f64 = 0.5;

/// Clamp a requested source count into `[1, cap]`
pub fn clamp_max_sources(requested: Option<usize>, cap: usize) -> usize {
    requested
        .unwrap_or(DEFAULT_MAX_SOURCES)
        .clamp(1, cap.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_max_sources() {
        assert_eq!(clamp_max_sources(None, MAX_SOURCES_CAP), 10);
        assert_eq!(clamp_max_sources(Some(0), MAX_SOURCES_CAP), 1);
        assert_eq!(clamp_max_sources(Some(500), MAX_SOURCES_CAP), 50);
        assert_eq!(clamp_max_sources(Some(7), 5), 5);
    }
}
