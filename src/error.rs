//! Error types for the Kontos library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`KontosError`] enum. The read and write halves of the index surface
//! distinct variants so callers can tell an indexing failure from a
//! reader-side failure.
//!
//! # Examples
//!
//! ```
//! use kontos::error::{KontosError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(KontosError::index("segment flush failed"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Kontos operations.
///
/// Uses the `thiserror` crate for the `Error` trait implementation and
/// provides convenient constructor methods for the common cases.
#[derive(Error, Debug)]
pub enum KontosError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors while building or committing an index.
    #[error("Index error: {0}")]
    Index(String),

    /// Errors while opening or reading an index.
    #[error("Index read error: {0}")]
    IndexRead(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Query-related errors (parsing, invalid queries, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with KontosError.
pub type Result<T> = std::result::Result<T, KontosError>;

impl KontosError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        KontosError::Index(msg.into())
    }

    /// Create a new index read error.
    pub fn index_read<S: Into<String>>(msg: S) -> Self {
        KontosError::IndexRead(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        KontosError::Analysis(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        KontosError::Query(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        KontosError::Storage(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = KontosError::index("Test index error");
        assert_eq!(error.to_string(), "Index error: Test index error");

        let error = KontosError::index_read("Test read error");
        assert_eq!(error.to_string(), "Index read error: Test read error");

        let error = KontosError::analysis("Test analysis error");
        assert_eq!(error.to_string(), "Analysis error: Test analysis error");

        let error = KontosError::query("Test query error");
        assert_eq!(error.to_string(), "Query error: Test query error");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let kontos_error = KontosError::from(io_error);

        match kontos_error {
            KontosError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }
}
