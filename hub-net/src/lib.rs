//! Research Hub Network Layer
//!
//! Provides HTTP plumbing for the source adapters:
//! - Configured `reqwest` client with user-agent rotation
//! - Simple retries on transport errors and 5xx/429
//! - HTML result parsing and snippet cleanup

pub mod client;
pub mod html;

pub use client::*;
pub use html::*;
