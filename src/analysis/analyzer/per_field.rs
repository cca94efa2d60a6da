//! Per-field analyzer.

use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::TokenStream;
use crate::error::Result;

/// An analyzer that applies different analyzers to different fields.
///
/// Fields without an explicit entry fall back to the default analyzer.
/// When using the same analyzer for multiple fields, reuse one instance
/// with `Arc::clone`.
///
/// # Example
///
/// ```
/// use kontos::analysis::analyzer::{Analyzer, KeywordAnalyzer, PerFieldAnalyzer, StandardAnalyzer};
/// use std::sync::Arc;
///
/// let mut analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new().unwrap()));
/// analyzer.add_analyzer("doc_id_field", Arc::new(KeywordAnalyzer::new()));
/// // "body" uses StandardAnalyzer, "doc_id_field" stays a single token
/// let tokens: Vec<_> = analyzer.analyze_field("doc_id_field", "doc one").unwrap().collect();
/// assert_eq!(tokens.len(), 1);
/// ```
#[derive(Clone)]
pub struct PerFieldAnalyzer {
    /// Default analyzer for fields not in the map.
    default_analyzer: Arc<dyn Analyzer>,

    /// Map of field names to their specific analyzers.
    field_analyzers: AHashMap<String, Arc<dyn Analyzer>>,
}

impl PerFieldAnalyzer {
    /// Create a new per-field analyzer with a default analyzer.
    pub fn new(default_analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            default_analyzer,
            field_analyzers: AHashMap::new(),
        }
    }

    /// Add a field-specific analyzer.
    pub fn add_analyzer(&mut self, field: impl Into<String>, analyzer: Arc<dyn Analyzer>) {
        self.field_analyzers.insert(field.into(), analyzer);
    }

    /// Get the analyzer for a specific field.
    pub fn get_analyzer(&self, field: &str) -> &Arc<dyn Analyzer> {
        self.field_analyzers
            .get(field)
            .unwrap_or(&self.default_analyzer)
    }

    /// Get the default analyzer.
    pub fn default_analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.default_analyzer
    }

    /// Analyze text with the analyzer for the given field.
    pub fn analyze_field(&self, field: &str, text: &str) -> Result<TokenStream> {
        self.get_analyzer(field).analyze(text)
    }
}

impl Analyzer for PerFieldAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        // When used as a regular Analyzer, use the default analyzer
        self.default_analyzer.analyze(text)
    }

    fn name(&self) -> &'static str {
        "per_field"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl std::fmt::Debug for PerFieldAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerFieldAnalyzer")
            .field("default_analyzer", &self.default_analyzer.name())
            .field(
                "fields",
                &self.field_analyzers.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Analyze `text` for `field`, honoring per-field configuration when the
/// analyzer is a [`PerFieldAnalyzer`].
pub fn analyze_for_field(
    analyzer: &Arc<dyn Analyzer>,
    field: &str,
    text: &str,
) -> Result<TokenStream> {
    match analyzer.as_any().downcast_ref::<PerFieldAnalyzer>() {
        Some(per_field) => per_field.analyze_field(field, text),
        None => analyzer.analyze(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::{KeywordAnalyzer, StandardAnalyzer};
    use crate::analysis::token::Token;

    #[test]
    fn test_per_field_analyzer() {
        let mut analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new().unwrap()));
        analyzer.add_analyzer("id", Arc::new(KeywordAnalyzer::new()));

        let id_tokens: Vec<Token> = analyzer.analyze_field("id", "Doc One").unwrap().collect();
        assert_eq!(id_tokens.len(), 1);
        assert_eq!(id_tokens[0].text, "Doc One");

        let body_tokens: Vec<Token> = analyzer
            .analyze_field("body", "Doc One")
            .unwrap()
            .collect();
        assert_eq!(body_tokens.len(), 2);
        assert_eq!(body_tokens[0].text, "doc");
        assert_eq!(body_tokens[1].text, "one");
    }

    #[test]
    fn test_per_field_default_analyzer() {
        let analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new().unwrap()));

        let tokens: Vec<Token> = analyzer.analyze("Hello World").unwrap().collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "hello");
    }

    #[test]
    fn test_analyze_for_field_downcast() {
        let mut per_field = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new().unwrap()));
        per_field.add_analyzer("id", Arc::new(KeywordAnalyzer::new()));
        let analyzer: Arc<dyn Analyzer> = Arc::new(per_field);

        let tokens: Vec<Token> = analyze_for_field(&analyzer, "id", "Doc One")
            .unwrap()
            .collect();
        assert_eq!(tokens.len(), 1);

        let plain: Arc<dyn Analyzer> = Arc::new(StandardAnalyzer::new().unwrap());
        let tokens: Vec<Token> = analyze_for_field(&plain, "id", "Doc One").unwrap().collect();
        assert_eq!(tokens.len(), 2);
    }
}
