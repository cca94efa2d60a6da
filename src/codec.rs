//! Pluggable on-disk formats for segment files.
//!
//! The only codec shipped here is the human-readable [`TextCodec`]: slow,
//! but every segment file can be opened in an editor, which is the point
//! of a demonstration index. Each file carries a crc32 checksum footer so
//! corruption and truncation surface as read errors instead of silently
//! wrong data.

pub mod text;

pub use text::TextCodec;
