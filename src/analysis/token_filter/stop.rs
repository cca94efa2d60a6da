//! Stop word filter implementation.
//!
//! Removes common words that carry little meaning for retrieval. The
//! default word list is a small English set; custom lists can be supplied
//! with [`StopFilter::from_words`].

use ahash::AHashSet;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// A filter that removes stop words from the token stream.
///
/// By default stopped tokens are removed entirely; with
/// `remove_stopped(false)` they are kept but marked as stopped.
#[derive(Clone, Debug)]
pub struct StopFilter {
    /// The set of words to remove.
    stop_words: AHashSet<String>,
    /// Whether to drop stopped tokens from the stream.
    remove_stopped: bool,
}

impl StopFilter {
    /// Create a new stop filter with the default English word list.
    pub fn new() -> Self {
        Self::from_words(DEFAULT_ENGLISH_STOP_WORDS.iter().copied())
    }

    /// Create a stop filter from a custom word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopFilter {
            stop_words: words.into_iter().map(Into::into).collect(),
            remove_stopped: true,
        }
    }

    /// Control whether stopped tokens are removed or only marked.
    pub fn remove_stopped(mut self, remove: bool) -> Self {
        self.remove_stopped = remove;
        self
    }

    /// Check whether a word is in the stop list.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens: Vec<_> = tokens
            .filter_map(|token| {
                if token.is_stopped() {
                    Some(token)
                } else if self.is_stop_word(&token.text) {
                    if self.remove_stopped {
                        None
                    } else {
                        Some(token.stop())
                    }
                } else {
                    Some(token)
                }
            })
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_stop_filter_removes_words() {
        let filter = StopFilter::new();
        let tokens = vec![
            Token::new("quick", 0),
            Token::new("the", 1),
            Token::new("fox", 2),
        ];

        let result: Vec<Token> = filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .collect();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "quick");
        assert_eq!(result[1].text, "fox");
    }

    #[test]
    fn test_stop_filter_mark_only() {
        let filter = StopFilter::from_words(vec!["the"]).remove_stopped(false);
        let tokens = vec![Token::new("the", 0), Token::new("fox", 1)];

        let result: Vec<Token> = filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .collect();

        assert_eq!(result.len(), 2);
        assert!(result[0].is_stopped());
        assert!(!result[1].is_stopped());
    }

    #[test]
    fn test_stop_filter_custom_words() {
        let filter = StopFilter::from_words(vec!["lorem"]);
        assert!(filter.is_stop_word("lorem"));
        assert!(!filter.is_stop_word("ipsum"));
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(StopFilter::new().name(), "stop");
    }
}
