//! Aggregator/Deduplicator
//!
//! Merges scored hits from every adapter into one ranked list:
//! 1. Deduplicate by normalized URL
//! 2. Stable sort by combined score, descending
//! 3. Truncate to the requested maximum

use hub_core::{ScoreWeights, ScoredHit};
use std::collections::HashMap;
use tracing::debug;

/// Ranks and deduplicates scored hits
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    weights: ScoreWeights,
}

impl Aggregator {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Deduplicate, rank and truncate.
    ///
    /// Input order must be adapter start order: on a URL collision the
    /// higher relevance wins, then the higher credibility, then the copy
    /// seen first.
    pub fn aggregate(&self, hits: Vec<ScoredHit>, max_sources: usize) -> Vec<ScoredHit> {
        let total = hits.len();
        let mut kept = dedupe(hits);
        let duplicates = total - kept.len();

        // sort_by is stable: equal scores keep first-seen order
        kept.sort_by(|a, b| {
            b.combined_score(&self.weights)
                .total_cmp(&a.combined_score(&self.weights))
        });
        kept.truncate(max_sources);

        debug!(
            "Aggregated {} hits: {} duplicates removed, {} kept",
            total,
            duplicates,
            kept.len()
        );
        kept
    }
}

/// Keep one hit per normalized URL, preserving first-seen positions
fn dedupe(hits: Vec<ScoredHit>) -> Vec<ScoredHit> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<ScoredHit> = Vec::with_capacity(hits.len());

    for hit in hits {
        let key = hit.hit.normalized_url();
        match index.get(&key) {
            Some(&pos) => {
                if replaces(&kept[pos], &hit) {
                    kept[pos] = hit;
                }
            }
            None => {
                index.insert(key, kept.len());
                kept.push(hit);
            }
        }
    }

    kept
}

/// Whether a later duplicate should replace the kept copy
fn replaces(current: &ScoredHit, candidate: &ScoredHit) -> bool {
    if candidate.relevance_score != current.relevance_score {
        return candidate.relevance_score > current.relevance_score;
    }
    candidate.credibility_score > current.credibility_score
}
