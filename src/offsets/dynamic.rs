//! Offset resolution recomputed from the analysis pipeline.

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::per_field::analyze_for_field;
use crate::error::Result;
use crate::offsets::{Offset, OffsetSource};

/// Resolves term offsets by re-running the analyzer over the original
/// text, without touching the index.
///
/// The token stream is parameterized by field name (a `PerFieldAnalyzer`
/// picks per-field behavior) and compared against the term by exact
/// equality over the post-analysis surface form. The stream is consumed
/// and dropped within the call on every exit path.
#[derive(Clone)]
pub struct DynamicOffsets {
    analyzer: Arc<dyn Analyzer>,
    text: String,
}

impl DynamicOffsets {
    /// Create a resolver over `text` using `analyzer`.
    pub fn new<S: Into<String>>(analyzer: Arc<dyn Analyzer>, text: S) -> Self {
        DynamicOffsets {
            analyzer,
            text: text.into(),
        }
    }

    /// The text this resolver analyzes.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl OffsetSource for DynamicOffsets {
    fn offsets(&self, field: &str, term: &str) -> Result<Vec<Offset>> {
        let tokens = analyze_for_field(&self.analyzer, field, &self.text)?;

        Ok(tokens
            .filter(|token| !token.is_stopped() && token.text == term)
            .map(|token| Offset::new(token.start_offset, token.end_offset))
            .collect())
    }
}

impl std::fmt::Debug for DynamicOffsets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicOffsets")
            .field("analyzer", &self.analyzer.name())
            .field("text", &self.text)
            .finish()
    }
}
