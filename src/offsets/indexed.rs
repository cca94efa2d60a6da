//! Offset resolution from the persisted term vector sidecar.

use std::sync::Arc;

use crate::error::Result;
use crate::index::reader::IndexReader;
use crate::offsets::{Offset, OffsetSource};
use crate::storage::Storage;

/// Resolves term offsets by reading them back from the index.
///
/// Each call opens a short-lived reader over the storage, fetches the term
/// vector recorded for (`doc_id`, field), seeks the term exactly, and
/// walks its occurrences in vector order — which is analyzer emission
/// order. Occurrences whose vector did not record offsets are skipped, not
/// errors; so are missing vectors, fields, and terms.
#[derive(Debug, Clone)]
pub struct IndexedOffsets {
    storage: Arc<dyn Storage>,
    doc_id: u64,
}

impl IndexedOffsets {
    /// Create a resolver for `doc_id` over the index in `storage`.
    pub fn new(storage: Arc<dyn Storage>, doc_id: u64) -> Self {
        IndexedOffsets { storage, doc_id }
    }

    /// The document this resolver reads vectors for.
    pub fn doc_id(&self) -> u64 {
        self.doc_id
    }
}

impl OffsetSource for IndexedOffsets {
    fn offsets(&self, field: &str, term: &str) -> Result<Vec<Offset>> {
        // Reader is scoped to this call and dropped on every exit path.
        let reader = IndexReader::open(Arc::clone(&self.storage))?;

        let Some(vector) = reader.term_vector(self.doc_id, field) else {
            return Ok(Vec::new());
        };
        let Some(entry) = vector.entry(term) else {
            return Ok(Vec::new());
        };

        Ok(entry
            .occurrences
            .iter()
            .filter_map(|occurrence| occurrence.offsets)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::StandardAnalyzer;
    use crate::document::{Document, IndexOptions, TermVectorOptions, TextOption};
    use crate::index::writer::{IndexWriter, IndexWriterConfig};
    use crate::storage::MemoryStorage;

    fn build_index(text: &str, term_vectors: TermVectorOptions) -> Arc<dyn Storage> {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::default());
        let mut writer = IndexWriter::create(
            Arc::clone(&storage),
            IndexWriterConfig {
                analyzer: Arc::new(StandardAnalyzer::new().unwrap()),
                ..Default::default()
            },
        )
        .unwrap();

        let doc = Document::builder()
            .add_text(
                "body",
                text,
                TextOption {
                    stored: false,
                    index_options: IndexOptions::Docs,
                    term_vectors,
                },
            )
            .build();
        writer.add_document(doc).unwrap();
        writer.close().unwrap();
        storage
    }

    #[test]
    fn test_indexed_offsets_for_sample_text() {
        let storage = build_index(
            "Lorem - ipsum dolor, sit amet ipsum",
            TermVectorOptions::WithPositionsOffsets,
        );
        let resolver = IndexedOffsets::new(storage, 0);

        let offsets = resolver.offsets("body", "ipsum").unwrap();
        assert_eq!(offsets, vec![Offset::new(8, 13), Offset::new(30, 35)]);
    }

    #[test]
    fn test_indexed_offsets_missing_term_is_empty() {
        let storage = build_index("lorem ipsum", TermVectorOptions::WithPositionsOffsets);
        let resolver = IndexedOffsets::new(storage, 0);

        assert!(resolver.offsets("body", "banana").unwrap().is_empty());
        assert!(resolver.offsets("missing", "ipsum").unwrap().is_empty());
    }

    #[test]
    fn test_indexed_offsets_missing_doc_is_empty() {
        let storage = build_index("lorem ipsum", TermVectorOptions::WithPositionsOffsets);
        let resolver = IndexedOffsets::new(storage, 42);

        assert!(resolver.offsets("body", "ipsum").unwrap().is_empty());
    }

    #[test]
    fn test_indexed_offsets_skips_offsetless_vectors() {
        // Positions recorded, offsets not: occurrences are skipped rather
        // than failing.
        let storage = build_index("lorem ipsum", TermVectorOptions::WithPositions);
        let resolver = IndexedOffsets::new(storage, 0);

        assert!(resolver.offsets("body", "ipsum").unwrap().is_empty());
    }
}
