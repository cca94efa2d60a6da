//! Index writer implementation.
//!
//! The writer opens its directory in CREATE mode (any previous index files
//! are deleted), buffers analyzed documents in memory, and flushes them as
//! a single segment on commit. Commit writes the segment files first and
//! the index metadata last, so a crashed build leaves a directory without
//! `metadata.json` rather than a half-readable index.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use ahash::AHashMap;

use crate::analysis::analyzer::per_field::analyze_for_field;
use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
use crate::analysis::token::Token;
use crate::codec::TextCodec;
use crate::document::{Document, IndexOptions, TermVectorOptions};
use crate::error::{KontosError, Result};
use crate::index::postings::SegmentPostings;
use crate::index::segment::{IndexMetadata, METADATA_FILE, SegmentInfo, SegmentStored};
use crate::index::vector::{SegmentVectors, VectorOccurrence};
use crate::offsets::Offset;
use crate::storage::{Storage, StorageOutput};

/// Index writer configuration.
#[derive(Clone)]
pub struct IndexWriterConfig {
    /// Analyzer for text fields (use a `PerFieldAnalyzer` for
    /// field-specific analysis).
    pub analyzer: Arc<dyn Analyzer>,

    /// Segment name prefix.
    pub segment_prefix: String,
}

impl std::fmt::Debug for IndexWriterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexWriterConfig")
            .field("analyzer", &self.analyzer.name())
            .field("segment_prefix", &self.segment_prefix)
            .finish()
    }
}

impl Default for IndexWriterConfig {
    fn default() -> Self {
        IndexWriterConfig {
            analyzer: Arc::new(
                StandardAnalyzer::new().expect("standard analyzer should be creatable"),
            ),
            segment_prefix: "segment".to_string(),
        }
    }
}

/// Index writer accumulating one segment in memory.
pub struct IndexWriter {
    /// The storage backend.
    storage: Arc<dyn Storage>,

    /// Writer configuration.
    config: IndexWriterConfig,

    /// The codec used to persist segment files.
    codec: TextCodec,

    /// In-memory postings being built.
    postings: SegmentPostings,

    /// In-memory term vectors being built.
    vectors: SegmentVectors,

    /// In-memory stored fields being built.
    stored: SegmentStored,

    /// Document ID counter.
    next_doc_id: u64,

    /// Whether the writer is closed.
    closed: bool,
}

impl std::fmt::Debug for IndexWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexWriter")
            .field("config", &self.config)
            .field("next_doc_id", &self.next_doc_id)
            .field("closed", &self.closed)
            .finish()
    }
}

impl IndexWriter {
    /// Create a new writer over `storage`, truncating any existing index.
    pub fn create(storage: Arc<dyn Storage>, config: IndexWriterConfig) -> Result<Self> {
        // CREATE open mode: the directory starts empty.
        for file in storage.list_files()? {
            storage.delete_file(&file)?;
        }

        Ok(IndexWriter {
            storage,
            config,
            codec: TextCodec::new(),
            postings: SegmentPostings::new(),
            vectors: SegmentVectors::new(),
            stored: SegmentStored::new(),
            next_doc_id: 0,
            closed: false,
        })
    }

    /// Add a document, returning its assigned document ID.
    pub fn add_document(&mut self, doc: Document) -> Result<u64> {
        self.check_closed()?;

        let doc_id = self.next_doc_id;

        for field in doc.fields() {
            let tokens: Vec<Token> =
                analyze_for_field(&self.config.analyzer, &field.name, &field.value)?
                    .filter(|t| !t.is_stopped())
                    .collect();

            if field.options.stored {
                self.stored
                    .entry(doc_id)
                    .or_default()
                    .insert(field.name.clone(), field.value.clone());
            }

            self.index_tokens(doc_id, field, &tokens);
        }

        self.next_doc_id += 1;
        Ok(doc_id)
    }

    /// Record postings and term vectors for one analyzed field.
    fn index_tokens(&mut self, doc_id: u64, field: &crate::document::Field, tokens: &[Token]) {
        let field_postings = self.postings.entry(field.name.clone()).or_default();
        field_postings.add_document(doc_id, tokens.len() as u32);

        let mut counts: AHashMap<&str, u32> = AHashMap::new();
        for token in tokens {
            *counts.entry(token.text.as_str()).or_insert(0) += 1;
        }

        for (term, count) in counts {
            let frequency = match field.options.index_options {
                // Document-level postings only: frequency pinned to 1.
                IndexOptions::Docs => 1,
                IndexOptions::DocsAndFreqs => count,
            };
            field_postings.add_term(term, doc_id, frequency);
        }

        if field.options.term_vectors.enabled() {
            let vector = self
                .vectors
                .entry(doc_id)
                .or_default()
                .entry(field.name.clone())
                .or_default();

            for token in tokens {
                let entry = vector.terms.entry(token.text.clone()).or_default();
                match field.options.term_vectors {
                    TermVectorOptions::Yes => entry.freq += 1,
                    TermVectorOptions::WithPositions => entry.push(VectorOccurrence {
                        position: token.position as u32,
                        offsets: None,
                    }),
                    TermVectorOptions::WithPositionsOffsets => entry.push(VectorOccurrence {
                        position: token.position as u32,
                        offsets: Some(Offset::new(token.start_offset, token.end_offset)),
                    }),
                    TermVectorOptions::No => unreachable!("guarded by enabled()"),
                }
            }
        }
    }

    /// Flush the buffered segment and metadata to storage.
    ///
    /// This is the durability point: after `commit` returns, a reader sees
    /// the full segment.
    pub fn commit(&mut self) -> Result<()> {
        self.check_closed()?;

        let info = SegmentInfo {
            segment_id: SegmentInfo::segment_id(&self.config.segment_prefix, 0),
            doc_count: self.next_doc_id,
            doc_offset: 0,
            generation: 0,
        };

        self.codec
            .write_postings(self.storage.as_ref(), &info, &self.postings)?;
        self.codec
            .write_vectors(self.storage.as_ref(), &info, &self.vectors)?;
        self.codec
            .write_stored(self.storage.as_ref(), &info, &self.stored)?;

        let segment_json = serde_json::to_string_pretty(&info)?;
        self.write_file(&info.meta_file(), segment_json.as_bytes())?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let metadata = IndexMetadata {
            version: 1,
            codec: TextCodec::NAME.to_string(),
            created: now,
            modified: now,
            doc_count: self.next_doc_id,
            generation: 0,
        };
        let metadata_json = serde_json::to_string_pretty(&metadata)?;
        self.write_file(METADATA_FILE, metadata_json.as_bytes())?;

        self.storage.sync()?;
        Ok(())
    }

    /// Commit pending documents and mark the writer closed.
    pub fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.commit()
                .map_err(|e| KontosError::index(format!("close failed: {e}")))?;
            self.closed = true;
        }
        Ok(())
    }

    /// Number of documents added so far.
    pub fn doc_count(&self) -> u64 {
        self.next_doc_id
    }

    fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()> {
        use std::io::Write;

        let mut output = self.storage.create_output(name)?;
        output.write_all(bytes)?;
        output.close()?;
        Ok(())
    }

    fn check_closed(&self) -> Result<()> {
        if self.closed {
            Err(KontosError::index("Writer is closed"))
        } else {
            Ok(())
        }
    }
}
