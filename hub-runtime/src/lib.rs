//! Research hub runtime
//!
//! Orchestration of one research request across the source adapters, the
//! configuration that wires it together, and the HTTP service in front of it.

pub mod config;
pub mod orchestrator;
pub mod server;

#[cfg(test)]
mod testing;

pub use config::*;
pub use orchestrator::*;
pub use server::{router, run, AppState, ResearchRequest, SharedState};
