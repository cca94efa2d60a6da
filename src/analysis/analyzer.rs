//! Analyzer implementations that combine tokenizers and filters.
//!
//! Analyzers are the complete text processing pipeline:
//!
//! ```text
//! Raw Text → Tokenizer → Filter 1 → … → Filter N → Token Stream
//! ```
//!
//! The same analyzer instance is used at index time and at query time, so
//! offsets recomputed from the stream match the offsets persisted in the
//! term vector sidecar occurrence for occurrence.

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// Requires `Send + Sync` so analyzers can be shared across threads.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;

    /// Provide access to the concrete type for downcasting.
    ///
    /// Useful when a `&dyn Analyzer` needs type-specific methods, e.g.
    /// [`PerFieldAnalyzer::analyze_field`](per_field::PerFieldAnalyzer::analyze_field).
    fn as_any(&self) -> &dyn std::any::Any;
}

pub mod keyword;
pub mod per_field;
pub mod pipeline;
pub mod simple;
pub mod standard;

pub use keyword::KeywordAnalyzer;
pub use per_field::PerFieldAnalyzer;
pub use pipeline::PipelineAnalyzer;
pub use simple::SimpleAnalyzer;
pub use standard::StandardAnalyzer;
