//! Document structure for schema-less indexing.
//!
//! Documents are ordered collections of named text fields. Analyzers are
//! configured at the writer level (via [`IndexWriterConfig`]), not per
//! document; per-field options control storage, postings granularity, and
//! the term vector sidecar.
//!
//! [`IndexWriterConfig`]: crate::index::writer::IndexWriterConfig
//!
//! # Examples
//!
//! ```
//! use kontos::document::{Document, IndexOptions, TermVectorOptions, TextOption};
//!
//! let doc = Document::builder()
//!     .add_text("doc_id_field", "doc one", TextOption::stored_only())
//!     .add_text(
//!         "body",
//!         "Lorem - ipsum dolor, sit amet ipsum",
//!         TextOption {
//!             stored: false,
//!             index_options: IndexOptions::Docs,
//!             term_vectors: TermVectorOptions::WithPositionsOffsets,
//!         },
//!     )
//!     .build();
//!
//! assert_eq!(doc.len(), 2);
//! assert!(doc.has_field("body"));
//! ```

use serde::{Deserialize, Serialize};

/// Granularity of the postings recorded in the inverted index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexOptions {
    /// Document-level postings only; recorded frequency is pinned to 1.
    Docs,
    /// Documents and true term frequencies.
    DocsAndFreqs,
}

/// What the per-document term vector sidecar records for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermVectorOptions {
    /// No term vector for this field.
    No,
    /// Terms and frequencies only.
    Yes,
    /// Terms, frequencies, and per-occurrence positions.
    WithPositions,
    /// Terms, frequencies, and per-occurrence positions and offsets.
    WithPositionsOffsets,
}

impl TermVectorOptions {
    /// Whether any vector is recorded at all.
    pub fn enabled(&self) -> bool {
        !matches!(self, TermVectorOptions::No)
    }

    /// Whether per-occurrence offsets are recorded.
    pub fn offsets(&self) -> bool {
        matches!(self, TermVectorOptions::WithPositionsOffsets)
    }
}

/// Options for text fields.
///
/// Controls how a field is indexed, stored, and vectorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOption {
    /// Whether to store the original field value for retrieval.
    pub stored: bool,

    /// Postings granularity for the inverted index.
    pub index_options: IndexOptions,

    /// Term vector sidecar configuration.
    pub term_vectors: TermVectorOptions,
}

impl TextOption {
    /// An indexed, stored field without term vectors. Suits identifier
    /// fields analyzed as a single keyword token.
    pub fn stored_only() -> Self {
        TextOption {
            stored: true,
            index_options: IndexOptions::Docs,
            term_vectors: TermVectorOptions::No,
        }
    }
}

impl Default for TextOption {
    fn default() -> Self {
        TextOption {
            stored: true,
            index_options: IndexOptions::DocsAndFreqs,
            term_vectors: TermVectorOptions::No,
        }
    }
}

/// A single named field with its value and options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// The field name.
    pub name: String,
    /// The raw text value.
    pub value: String,
    /// Indexing and storage options.
    pub options: TextOption,
}

/// A document represents a single item to be indexed.
///
/// Fields keep their insertion order; schema-less, so any field name is
/// accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Document {
    fields: Vec<Field>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Document { fields: Vec::new() }
    }

    /// Add a field to the document.
    pub fn add_field<S: Into<String>, T: Into<String>>(
        &mut self,
        name: S,
        value: T,
        options: TextOption,
    ) {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
            options,
        });
    }

    /// Get a field by name (first match in insertion order).
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Get all fields in insertion order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Create a builder for constructing documents.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }
}

/// A builder for constructing documents in a fluent manner.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new() -> Self {
        DocumentBuilder {
            document: Document::new(),
        }
    }

    /// Add a text field to the document.
    ///
    /// The writer's default or field-specific analyzer is applied at index
    /// time.
    pub fn add_text<S: Into<String>, T: Into<String>>(
        mut self,
        name: S,
        value: T,
        options: TextOption,
    ) -> Self {
        self.document.add_field(name, value, options);
        self
    }

    /// Build the document.
    pub fn build(self) -> Document {
        self.document
    }
}
