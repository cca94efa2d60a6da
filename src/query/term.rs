//! Term query implementation for exact term matching.

use std::fmt;

/// A query that matches documents containing a specific term.
///
/// TermQuery performs exact matching and does NOT analyze the term; the
/// term should already be in normalized form. Use [`QueryParser`] to
/// normalize query strings before constructing one.
///
/// [`QueryParser`]: crate::query::parser::QueryParser
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    /// The field to search in.
    field: String,
    /// The term to search for.
    term: String,
    /// The boost factor for this query.
    boost: f32,
}

impl TermQuery {
    /// Create a new term query.
    pub fn new<F, T>(field: F, term: T) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        TermQuery {
            field: field.into(),
            term: term.into(),
            boost: 1.0,
        }
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Set the boost factor.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Get the boost factor.
    pub fn boost(&self) -> f32 {
        self.boost
    }
}

impl fmt::Display for TermQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.boost == 1.0 {
            write!(f, "{}:{}", self.field, self.term)
        } else {
            write!(f, "{}:{}^{}", self.field, self.term, self.boost)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_query_creation() {
        let query = TermQuery::new("body", "ipsum");

        assert_eq!(query.field(), "body");
        assert_eq!(query.term(), "ipsum");
        assert_eq!(query.boost(), 1.0);
        assert_eq!(query.to_string(), "body:ipsum");
    }

    #[test]
    fn test_term_query_with_boost() {
        let query = TermQuery::new("title", "hello").with_boost(2.0);

        assert_eq!(query.boost(), 2.0);
        assert_eq!(query.to_string(), "title:hello^2");
    }
}
