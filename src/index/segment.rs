//! Segment metadata and file naming.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Information about a segment in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentInfo {
    /// Segment identifier, e.g. `segment_000000`.
    pub segment_id: String,

    /// Number of documents in this segment.
    pub doc_count: u64,

    /// Document ID offset for this segment.
    pub doc_offset: u64,

    /// Generation number of this segment.
    pub generation: u64,
}

impl SegmentInfo {
    /// Build the identifier for segment number `n` under `prefix`.
    pub fn segment_id(prefix: &str, n: u64) -> String {
        format!("{prefix}_{n:06}")
    }

    /// Name of the segment metadata file.
    pub fn meta_file(&self) -> String {
        format!("{}.meta", self.segment_id)
    }

    /// Name of the postings / term dictionary file.
    pub fn postings_file(&self) -> String {
        format!("{}.pst", self.segment_id)
    }

    /// Name of the term vectors file.
    pub fn vectors_file(&self) -> String {
        format!("{}.vec", self.segment_id)
    }

    /// Name of the stored fields file.
    pub fn stored_file(&self) -> String {
        format!("{}.sto", self.segment_id)
    }
}

/// Stored field values of one segment: doc → field → value.
pub type SegmentStored = BTreeMap<u64, BTreeMap<String, String>>;

/// Name of the index-level metadata file.
pub const METADATA_FILE: &str = "metadata.json";

/// Metadata about an index, persisted as `metadata.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// Version of the index format.
    pub version: u32,

    /// Name of the codec the segments were written with.
    pub codec: String,

    /// Creation time (seconds since epoch).
    pub created: u64,

    /// Last modified time (seconds since epoch).
    pub modified: u64,

    /// Number of documents indexed.
    pub doc_count: u64,

    /// Generation number for updates.
    pub generation: u64,
}

impl Default for IndexMetadata {
    fn default() -> Self {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        IndexMetadata {
            version: 1,
            codec: String::new(),
            created: now,
            modified: now,
            doc_count: 0,
            generation: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_id_format() {
        assert_eq!(SegmentInfo::segment_id("segment", 0), "segment_000000");
        assert_eq!(SegmentInfo::segment_id("segment", 42), "segment_000042");
    }

    #[test]
    fn test_segment_file_names() {
        let info = SegmentInfo {
            segment_id: "segment_000000".to_string(),
            doc_count: 1,
            doc_offset: 0,
            generation: 0,
        };

        assert_eq!(info.meta_file(), "segment_000000.meta");
        assert_eq!(info.postings_file(), "segment_000000.pst");
        assert_eq!(info.vectors_file(), "segment_000000.vec");
        assert_eq!(info.stored_file(), "segment_000000.sto");
    }

    #[test]
    fn test_segment_info_json_roundtrip() {
        let info = SegmentInfo {
            segment_id: "segment_000001".to_string(),
            doc_count: 3,
            doc_offset: 0,
            generation: 1,
        };

        let json = serde_json::to_string(&info).unwrap();
        let back: SegmentInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, back);
    }
}
