//! Query parser for converting string queries to term queries.

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::per_field::analyze_for_field;
use crate::analysis::token::Token;
use crate::error::{KontosError, Result};
use crate::query::term::TermQuery;

/// A parser for single-term query strings.
///
/// Accepts `term` (against the default field) or `field:term`. The term
/// text runs through the analyzer configured for that field, so query
/// casing normalizes exactly as index casing did: parsing `Lorem` against
/// a standard-analyzed field yields `lorem`.
///
/// Anything beyond one term — phrases, boolean operators, input the
/// analyzer splits into several tokens — is rejected.
pub struct QueryParser {
    /// Default field to search in when no field is specified.
    default_field: Option<String>,
    /// Analyzer used to normalize query terms.
    analyzer: Arc<dyn Analyzer>,
}

impl QueryParser {
    /// Create a new query parser using `analyzer` for term normalization.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        QueryParser {
            default_field: None,
            analyzer,
        }
    }

    /// Set the default field to search in when no field is specified.
    pub fn with_default_field<S: Into<String>>(mut self, field: S) -> Self {
        self.default_field = Some(field.into());
        self
    }

    /// Get the default field.
    pub fn default_field(&self) -> Option<&str> {
        self.default_field.as_deref()
    }

    /// Parse a query string into a [`TermQuery`].
    pub fn parse(&self, query_str: &str) -> Result<TermQuery> {
        let trimmed = query_str.trim();
        if trimmed.is_empty() {
            return Err(KontosError::query("Empty query string"));
        }

        let (field, raw_term) = match trimmed.split_once(':') {
            Some((field, term)) => (field.to_string(), term),
            None => {
                let field = self.default_field.clone().ok_or_else(|| {
                    KontosError::query("No default field specified and no field prefix found")
                })?;
                (field, trimmed)
            }
        };

        if raw_term.trim().is_empty() {
            return Err(KontosError::query(format!(
                "Missing term after field '{field}'"
            )));
        }

        let tokens: Vec<Token> = analyze_for_field(&self.analyzer, &field, raw_term)?
            .filter(|t| !t.is_stopped())
            .collect();

        match tokens.as_slice() {
            [] => Err(KontosError::query(format!(
                "Query term '{raw_term}' analyzes to no tokens"
            ))),
            [token] => Ok(TermQuery::new(field, token.text.clone())),
            _ => Err(KontosError::query(
                "Only single-term queries are supported",
            )),
        }
    }
}

impl std::fmt::Debug for QueryParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryParser")
            .field("default_field", &self.default_field)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::{KeywordAnalyzer, PerFieldAnalyzer, StandardAnalyzer};

    fn standard_parser() -> QueryParser {
        QueryParser::new(Arc::new(StandardAnalyzer::new().unwrap()))
            .with_default_field("body")
    }

    #[test]
    fn test_parse_bare_term() {
        let query = standard_parser().parse("ipsum").unwrap();
        assert_eq!(query.field(), "body");
        assert_eq!(query.term(), "ipsum");
        assert_eq!(query.to_string(), "body:ipsum");
    }

    #[test]
    fn test_parse_lowercases_term() {
        // The analyzer normalizes query casing the same way it did at
        // index time.
        let query = standard_parser().parse("Lorem").unwrap();
        assert_eq!(query.term(), "lorem");
    }

    #[test]
    fn test_parse_field_prefixed_term() {
        let query = standard_parser().parse("title:Hello").unwrap();
        assert_eq!(query.field(), "title");
        assert_eq!(query.term(), "hello");
    }

    #[test]
    fn test_parse_keyword_field_keeps_spaces() {
        let mut per_field = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new().unwrap()));
        per_field.add_analyzer("doc_id_field", Arc::new(KeywordAnalyzer::new()));
        let parser = QueryParser::new(Arc::new(per_field)).with_default_field("body");

        let query = parser.parse("doc_id_field:doc one").unwrap();
        assert_eq!(query.field(), "doc_id_field");
        assert_eq!(query.term(), "doc one");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(standard_parser().parse("").is_err());
        assert!(standard_parser().parse("   ").is_err());
        assert!(standard_parser().parse("body:").is_err());
    }

    #[test]
    fn test_parse_rejects_multi_term() {
        assert!(standard_parser().parse("lorem ipsum").is_err());
    }

    #[test]
    fn test_parse_rejects_term_that_analyzes_away() {
        // Pure punctuation produces no tokens.
        assert!(standard_parser().parse("-,!").is_err());
    }

    #[test]
    fn test_parse_requires_default_field() {
        let parser = QueryParser::new(Arc::new(StandardAnalyzer::new().unwrap()));
        assert!(parser.parse("ipsum").is_err());
    }
}
