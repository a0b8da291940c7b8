//! Research Hub Agents
//!
//! Pipeline stages between classification and the final result:
//! - **Adapters**: fetch raw hits from web, encyclopedia, community and code search
//! - **Refiner**: shapes the query for each adapter
//! - **Scorer**: attaches relevance and credibility
//! - **Aggregator**: deduplicates and ranks
//! - **Summarizer**: template, model and fallback strategies
//!
//! ## LLM backends
//!
//! Model summaries go through [`backend::LlmBackend`], with OpenAI-compatible
//! and Anthropic implementations.

pub mod adapters;
pub mod aggregator;
pub mod backend;
pub mod refiner;
pub mod scorer;
pub mod summarizer;
pub mod traits;

pub use adapters::*;
pub use aggregator::*;
pub use backend::*;
pub use refiner::*;
pub use scorer::*;
pub use summarizer::*;
pub use traits::*;
