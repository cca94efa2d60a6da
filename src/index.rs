//! Index management: segments, writer, reader.
//!
//! An index is a directory of immutable segment files plus a JSON metadata
//! file. The writer accumulates analyzed documents in memory and flushes
//! them as one segment on commit; readers load the segment set and serve
//! postings, stored fields, term dictionaries, and term vectors.

pub mod postings;
pub mod reader;
pub mod segment;
pub mod vector;
pub mod writer;

pub use reader::IndexReader;
pub use segment::SegmentInfo;
pub use vector::{TermVector, TermVectorEntry, VectorOccurrence};
pub use writer::{IndexWriter, IndexWriterConfig};
