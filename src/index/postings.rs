//! Posting lists and per-field statistics.
//!
//! These are the in-memory forms of the inverted index: the writer builds
//! them while analyzing documents, the codec persists them, and the reader
//! serves them back for query evaluation.

use std::collections::BTreeMap;

/// A single posting in a posting list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// Document ID.
    pub doc_id: u64,
    /// Term frequency in the document. Pinned to 1 when the field is
    /// indexed with document-level postings only.
    pub frequency: u32,
}

impl Posting {
    /// Create a new posting.
    pub fn new(doc_id: u64, frequency: u32) -> Self {
        Posting { doc_id, frequency }
    }
}

/// A posting list for a specific term, ordered by document ID.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostingList {
    /// The postings in this list.
    pub postings: Vec<Posting>,
}

impl PostingList {
    /// Create a new empty posting list.
    pub fn new() -> Self {
        PostingList {
            postings: Vec::new(),
        }
    }

    /// Add a posting, keeping the list sorted by doc_id and merging
    /// frequencies for an already-present document.
    pub fn add_posting(&mut self, posting: Posting) {
        match self
            .postings
            .binary_search_by_key(&posting.doc_id, |p| p.doc_id)
        {
            Ok(pos) => {
                self.postings[pos].frequency += posting.frequency;
            }
            Err(pos) => {
                self.postings.insert(pos, posting);
            }
        }
    }

    /// Document frequency (number of documents containing this term).
    pub fn doc_freq(&self) -> u64 {
        self.postings.len() as u64
    }

    /// Total term frequency across all documents.
    pub fn total_freq(&self) -> u64 {
        self.postings.iter().map(|p| p.frequency as u64).sum()
    }

    /// Check if the posting list is empty.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Get an iterator over the postings.
    pub fn iter(&'_ self) -> std::slice::Iter<'_, Posting> {
        self.postings.iter()
    }
}

/// The postings and statistics of one field within a segment.
///
/// Terms are keyed in a `BTreeMap`, so iteration yields the codec's
/// canonical lexicographic (UTF-8 byte) order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldPostings {
    /// Number of documents that carry this field.
    pub doc_count: u64,
    /// Total token count across all documents for this field.
    pub sum_length: u64,
    /// Per-document token counts.
    pub lengths: BTreeMap<u64, u32>,
    /// Term dictionary with posting lists, in term order.
    pub terms: BTreeMap<String, PostingList>,
}

impl FieldPostings {
    /// Average field length across documents carrying the field.
    pub fn avg_length(&self) -> f64 {
        if self.doc_count == 0 {
            0.0
        } else {
            self.sum_length as f64 / self.doc_count as f64
        }
    }

    /// Record one analyzed document of `length` tokens.
    pub fn add_document(&mut self, doc_id: u64, length: u32) {
        self.doc_count += 1;
        self.sum_length += length as u64;
        self.lengths.insert(doc_id, length);
    }

    /// Add an occurrence count of `term` in `doc_id`.
    pub fn add_term(&mut self, term: &str, doc_id: u64, frequency: u32) {
        self.terms
            .entry(term.to_string())
            .or_default()
            .add_posting(Posting::new(doc_id, frequency));
    }
}

/// All field postings of one segment, in field-name order.
pub type SegmentPostings = BTreeMap<String, FieldPostings>;
