//! # Kontos
//!
//! A small full-text indexing library built to demonstrate two equivalent
//! ways of obtaining character offsets for a term in an indexed text field:
//! reading them back from a persisted term-vector sidecar, or recomputing
//! them on the fly from the same analysis pipeline.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Flexible text analysis pipeline
//! - Pluggable storage backends
//! - Human-readable text codec with per-occurrence term vector offsets
//! - Single-term queries with BM25 scoring

pub mod analysis;
pub mod codec;
pub mod demo;
pub mod document;
pub mod error;
pub mod index;
pub mod offsets;
pub mod query;
pub mod search;
pub mod storage;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
