//! Text analysis module for Kontos.
//!
//! This module provides the core text analysis functionality including
//! tokenization, filtering, and analysis pipelines. A single pipeline is
//! used both at index time (feeding the term vector sidecar) and at query
//! time (recomputing offsets dynamically), which is what makes the two
//! offset sources comparable.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, KeywordAnalyzer, PerFieldAnalyzer, PipelineAnalyzer, StandardAnalyzer};
pub use token::{Token, TokenStream};
