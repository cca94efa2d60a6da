//! Index reader implementation.
//!
//! Readers are short-lived and read-only: open, serve lookups, drop. A
//! reader never observes a writer's in-flight state because commit writes
//! `metadata.json` last and readers refuse to open without it.

use std::sync::Arc;

use crate::codec::TextCodec;
use crate::error::{KontosError, Result};
use crate::index::postings::{PostingList, SegmentPostings};
use crate::index::segment::{IndexMetadata, METADATA_FILE, SegmentInfo, SegmentStored};
use crate::index::vector::{SegmentVectors, TermVector};
use crate::storage::{Storage, StorageInput};

/// Aggregated statistics of one field across all segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    /// Number of documents carrying the field.
    pub doc_count: u64,
    /// Average token count of the field.
    pub avg_length: f64,
}

/// A reader over one segment (one "leaf" of the index).
#[derive(Debug)]
pub struct SegmentReader {
    info: SegmentInfo,
    postings: SegmentPostings,
    vectors: SegmentVectors,
    stored: SegmentStored,
}

impl SegmentReader {
    /// Load a segment's files from storage.
    fn open(storage: &dyn Storage, info: SegmentInfo, codec: &TextCodec) -> Result<Self> {
        let postings = codec.read_postings(storage, &info)?;
        let vectors = codec.read_vectors(storage, &info)?;
        let stored = codec.read_stored(storage, &info)?;

        Ok(SegmentReader {
            info,
            postings,
            vectors,
            stored,
        })
    }

    /// Segment metadata.
    pub fn info(&self) -> &SegmentInfo {
        &self.info
    }

    /// Number of documents in this segment.
    pub fn doc_count(&self) -> u64 {
        self.info.doc_count
    }

    /// Iterate the field's term dictionary in codec (lexicographic UTF-8
    /// byte) order. `None` if the segment has no such field.
    pub fn terms(&self, field: &str) -> Option<impl Iterator<Item = &str>> {
        self.postings
            .get(field)
            .map(|fp| fp.terms.keys().map(String::as_str))
    }

    /// The posting list of `term` in `field`, if present.
    pub fn postings(&self, field: &str, term: &str) -> Option<&PostingList> {
        self.postings.get(field)?.terms.get(term)
    }

    /// The term vector recorded for (`doc_id`, `field`), if any.
    pub fn term_vector(&self, doc_id: u64, field: &str) -> Option<&TermVector> {
        self.vectors.get(&doc_id)?.get(field)
    }

    /// The stored value of `field` in `doc_id`, if stored.
    pub fn stored_field(&self, doc_id: u64, field: &str) -> Option<&str> {
        self.stored
            .get(&doc_id)?
            .get(field)
            .map(String::as_str)
    }

    /// Token count of `field` in `doc_id`, if the document carries it.
    pub fn field_length(&self, doc_id: u64, field: &str) -> Option<u32> {
        self.postings.get(field)?.lengths.get(&doc_id).copied()
    }
}

/// A reader over a whole index directory.
pub struct IndexReader {
    #[allow(dead_code)]
    storage: Arc<dyn Storage>,
    metadata: IndexMetadata,
    segments: Vec<SegmentReader>,
}

impl std::fmt::Debug for IndexReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexReader")
            .field("doc_count", &self.metadata.doc_count)
            .field("segments", &self.segments.len())
            .finish()
    }
}

impl IndexReader {
    /// Open a reader over the index in `storage`.
    pub fn open(storage: Arc<dyn Storage>) -> Result<Self> {
        if !storage.file_exists(METADATA_FILE) {
            return Err(KontosError::index_read("Index does not exist"));
        }

        let metadata: IndexMetadata = read_json(storage.as_ref(), METADATA_FILE)?;
        if metadata.codec != TextCodec::NAME {
            return Err(KontosError::index_read(format!(
                "unsupported codec: {}",
                metadata.codec
            )));
        }

        // Collect segment descriptors, ordered by generation.
        let mut infos = Vec::new();
        for file in storage.list_files()? {
            if file.ends_with(".meta") {
                let info: SegmentInfo = read_json(storage.as_ref(), &file)?;
                infos.push(info);
            }
        }
        infos.sort_by_key(|info| info.generation);

        let codec = TextCodec::new();
        let mut segments = Vec::with_capacity(infos.len());
        for info in infos {
            segments.push(SegmentReader::open(storage.as_ref(), info, &codec)?);
        }

        Ok(IndexReader {
            storage,
            metadata,
            segments,
        })
    }

    /// Total number of documents in the index.
    pub fn doc_count(&self) -> u64 {
        self.metadata.doc_count
    }

    /// The per-segment readers, in reader-enumeration order.
    pub fn leaves(&self) -> &[SegmentReader] {
        &self.segments
    }

    /// The term vector recorded for (`doc_id`, `field`), if any.
    pub fn term_vector(&self, doc_id: u64, field: &str) -> Option<&TermVector> {
        self.segments
            .iter()
            .find_map(|leaf| leaf.term_vector(doc_id, field))
    }

    /// The stored value of `field` in `doc_id`, if stored.
    pub fn stored_field(&self, doc_id: u64, field: &str) -> Option<&str> {
        self.segments
            .iter()
            .find_map(|leaf| leaf.stored_field(doc_id, field))
    }

    /// The merged posting list of `term` in `field` across segments, or
    /// `None` if no segment carries the term.
    pub fn postings(&self, field: &str, term: &str) -> Option<PostingList> {
        let mut merged = PostingList::new();
        let mut found = false;

        for leaf in &self.segments {
            if let Some(list) = leaf.postings(field, term) {
                found = true;
                for posting in list.iter() {
                    merged.add_posting(posting.clone());
                }
            }
        }

        found.then_some(merged)
    }

    /// Aggregated statistics of `field`, or `None` if absent everywhere.
    pub fn field_stats(&self, field: &str) -> Option<FieldStats> {
        let mut doc_count = 0u64;
        let mut sum_length = 0u64;
        let mut found = false;

        for leaf in &self.segments {
            if let Some(fp) = leaf.postings.get(field) {
                found = true;
                doc_count += fp.doc_count;
                sum_length += fp.sum_length;
            }
        }

        found.then(|| FieldStats {
            doc_count,
            avg_length: if doc_count == 0 {
                0.0
            } else {
                sum_length as f64 / doc_count as f64
            },
        })
    }

    /// Token count of `field` in `doc_id`, if the document carries it.
    pub fn field_length(&self, doc_id: u64, field: &str) -> Option<u32> {
        self.segments
            .iter()
            .find_map(|leaf| leaf.field_length(doc_id, field))
    }

    /// List every term of `field`: per segment in enumeration order, terms
    /// in codec order within each segment, no global merge. An absent
    /// field yields an empty vector.
    pub fn list_terms(&self, field: &str) -> Vec<String> {
        let mut terms = Vec::new();
        for leaf in &self.segments {
            if let Some(iter) = leaf.terms(field) {
                terms.extend(iter.map(str::to_string));
            }
        }
        terms
    }
}

fn read_json<T: serde::de::DeserializeOwned>(storage: &dyn Storage, name: &str) -> Result<T> {
    use std::io::Read;

    let mut input = storage.open_input(name)?;
    let mut content = String::new();
    input.read_to_string(&mut content)?;
    input.close()?;

    serde_json::from_str(&content)
        .map_err(|e| KontosError::index_read(format!("Failed to parse {name}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::{KeywordAnalyzer, PerFieldAnalyzer, StandardAnalyzer};
    use crate::document::{Document, IndexOptions, TermVectorOptions, TextOption};
    use crate::index::writer::{IndexWriter, IndexWriterConfig};
    use crate::storage::MemoryStorage;

    fn build_demo_index(storage: &Arc<dyn Storage>) {
        let mut analyzer = PerFieldAnalyzer::new(Arc::new(
            StandardAnalyzer::new().expect("standard analyzer"),
        ));
        analyzer.add_analyzer("doc_id_field", Arc::new(KeywordAnalyzer::new()));

        let mut writer = IndexWriter::create(
            Arc::clone(storage),
            IndexWriterConfig {
                analyzer: Arc::new(analyzer),
                ..Default::default()
            },
        )
        .unwrap();

        let doc = Document::builder()
            .add_text("doc_id_field", "doc one", TextOption::stored_only())
            .add_text(
                "body",
                "Lorem - ipsum dolor, sit amet ipsum",
                TextOption {
                    stored: false,
                    index_options: IndexOptions::Docs,
                    term_vectors: TermVectorOptions::WithPositionsOffsets,
                },
            )
            .build();
        writer.add_document(doc).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn test_reader_requires_metadata() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::default());
        let err = IndexReader::open(storage).unwrap_err();
        assert!(matches!(err, KontosError::IndexRead(_)));
    }

    #[test]
    fn test_reader_doc_count_and_leaves() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::default());
        build_demo_index(&storage);

        let reader = IndexReader::open(storage).unwrap();
        assert_eq!(reader.doc_count(), 1);
        assert_eq!(reader.leaves().len(), 1);
        assert_eq!(reader.leaves()[0].doc_count(), 1);
    }

    #[test]
    fn test_reader_term_vector() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::default());
        build_demo_index(&storage);

        let reader = IndexReader::open(storage).unwrap();
        let vector = reader.term_vector(0, "body").unwrap();
        let entry = vector.entry("ipsum").unwrap();
        assert_eq!(entry.freq, 2);

        assert!(reader.term_vector(0, "doc_id_field").is_none());
        assert!(reader.term_vector(7, "body").is_none());
    }

    #[test]
    fn test_reader_stored_field() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::default());
        build_demo_index(&storage);

        let reader = IndexReader::open(storage).unwrap();
        assert_eq!(reader.stored_field(0, "doc_id_field"), Some("doc one"));
        // The body value was not stored.
        assert_eq!(reader.stored_field(0, "body"), None);
    }

    #[test]
    fn test_reader_postings_and_stats() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::default());
        build_demo_index(&storage);

        let reader = IndexReader::open(storage).unwrap();
        let list = reader.postings("body", "ipsum").unwrap();
        assert_eq!(list.doc_freq(), 1);

        let stats = reader.field_stats("body").unwrap();
        assert_eq!(stats.doc_count, 1);
        assert_eq!(stats.avg_length, 6.0);
        assert_eq!(reader.field_length(0, "body"), Some(6));

        assert!(reader.postings("body", "banana").is_none());
        assert!(reader.field_stats("missing").is_none());
    }

    #[test]
    fn test_reader_list_terms() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::default());
        build_demo_index(&storage);

        let reader = IndexReader::open(storage).unwrap();
        assert_eq!(
            reader.list_terms("body"),
            vec!["amet", "dolor", "ipsum", "lorem", "sit"]
        );
        assert_eq!(reader.list_terms("doc_id_field"), vec!["doc one"]);
        assert!(reader.list_terms("missing").is_empty());
    }
}
