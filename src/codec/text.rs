//! Human-readable text codec for segment files.
//!
//! Line-oriented, two-space nesting, one fact per line. A segment is four
//! files: postings (`.pst`), term vectors (`.vec`), stored fields
//! (`.sto`), and JSON metadata (`.meta`, handled by the index layer). The
//! three text files end with a `checksum <crc32>` footer computed over
//! everything above it.
//!
//! Postings file:
//!
//! ```text
//! field body
//!   stats doc_count 1 sum_length 6
//!   length 0 6
//!   term ipsum
//!     posting 0 freq 2
//! checksum 2868741632
//! ```
//!
//! Vectors file (an occurrence line without `offsets` means offsets were
//! not recorded for that vector):
//!
//! ```text
//! doc 0
//!   field body
//!     term ipsum
//!       freq 2
//!       position 1 offsets 8 13
//!       position 5 offsets 30 35
//! checksum 1381699508
//! ```

use std::io::Read;
use std::str::FromStr;

use crate::error::{KontosError, Result};
use crate::index::postings::{FieldPostings, Posting, SegmentPostings};
use crate::index::segment::{SegmentInfo, SegmentStored};
use crate::index::vector::{SegmentVectors, TermVector, VectorOccurrence};
use crate::offsets::Offset;
use crate::storage::{Storage, StorageOutput};

/// The human-readable text codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl TextCodec {
    /// Codec identifier recorded in the index metadata.
    pub const NAME: &'static str = "text";

    /// Create a new text codec.
    pub fn new() -> Self {
        TextCodec
    }

    /// Write the postings file of a segment.
    pub fn write_postings(
        &self,
        storage: &dyn Storage,
        info: &SegmentInfo,
        postings: &SegmentPostings,
    ) -> Result<()> {
        let mut writer = TextFileWriter::create(storage, &info.postings_file())?;

        for (field, field_postings) in postings {
            writer.line(0, &format!("field {field}"))?;
            writer.line(
                1,
                &format!(
                    "stats doc_count {} sum_length {}",
                    field_postings.doc_count, field_postings.sum_length
                ),
            )?;
            for (doc_id, length) in &field_postings.lengths {
                writer.line(1, &format!("length {doc_id} {length}"))?;
            }
            for (term, list) in &field_postings.terms {
                writer.line(1, &format!("term {term}"))?;
                for posting in list.iter() {
                    writer.line(
                        2,
                        &format!("posting {} freq {}", posting.doc_id, posting.frequency),
                    )?;
                }
            }
        }

        writer.finish()
    }

    /// Read the postings file of a segment.
    pub fn read_postings(
        &self,
        storage: &dyn Storage,
        info: &SegmentInfo,
    ) -> Result<SegmentPostings> {
        let name = info.postings_file();
        let payload = read_verified(storage, &name)?;

        let mut postings = SegmentPostings::new();
        let mut cur_field: Option<String> = None;
        let mut cur_term: Option<String> = None;

        for line in payload.lines() {
            let t = line.trim_start();
            if t.is_empty() {
                continue;
            }

            if let Some(field) = t.strip_prefix("field ") {
                postings.insert(field.to_string(), FieldPostings::default());
                cur_field = Some(field.to_string());
                cur_term = None;
            } else if let Some(rest) = t.strip_prefix("stats ") {
                let field = current(&mut postings, &cur_field, &name)?;
                let mut parts = rest.split_whitespace();
                expect_key(parts.next(), "doc_count", &name)?;
                field.doc_count = parse_num(parts.next(), &name, "doc_count")?;
                expect_key(parts.next(), "sum_length", &name)?;
                field.sum_length = parse_num(parts.next(), &name, "sum_length")?;
            } else if let Some(rest) = t.strip_prefix("length ") {
                let field = current(&mut postings, &cur_field, &name)?;
                let mut parts = rest.split_whitespace();
                let doc_id = parse_num(parts.next(), &name, "doc id")?;
                let length = parse_num(parts.next(), &name, "field length")?;
                field.lengths.insert(doc_id, length);
            } else if let Some(term) = t.strip_prefix("term ") {
                let field = current(&mut postings, &cur_field, &name)?;
                field.terms.entry(term.to_string()).or_default();
                cur_term = Some(term.to_string());
            } else if let Some(rest) = t.strip_prefix("posting ") {
                let field = current(&mut postings, &cur_field, &name)?;
                let term = cur_term
                    .as_ref()
                    .ok_or_else(|| malformed(&name, "posting line outside a term"))?;
                let mut parts = rest.split_whitespace();
                let doc_id = parse_num(parts.next(), &name, "doc id")?;
                expect_key(parts.next(), "freq", &name)?;
                let frequency = parse_num(parts.next(), &name, "frequency")?;
                field
                    .terms
                    .get_mut(term)
                    .expect("current term was just inserted")
                    .add_posting(Posting::new(doc_id, frequency));
            } else {
                return Err(malformed(&name, t));
            }
        }

        Ok(postings)
    }

    /// Write the term vectors file of a segment.
    pub fn write_vectors(
        &self,
        storage: &dyn Storage,
        info: &SegmentInfo,
        vectors: &SegmentVectors,
    ) -> Result<()> {
        let mut writer = TextFileWriter::create(storage, &info.vectors_file())?;

        for (doc_id, fields) in vectors {
            writer.line(0, &format!("doc {doc_id}"))?;
            for (field, vector) in fields {
                writer.line(1, &format!("field {field}"))?;
                for (term, entry) in &vector.terms {
                    writer.line(2, &format!("term {term}"))?;
                    writer.line(3, &format!("freq {}", entry.freq))?;
                    for occurrence in &entry.occurrences {
                        match occurrence.offsets {
                            Some(offset) => writer.line(
                                3,
                                &format!(
                                    "position {} offsets {} {}",
                                    occurrence.position, offset.start, offset.end
                                ),
                            )?,
                            None => {
                                writer.line(3, &format!("position {}", occurrence.position))?
                            }
                        }
                    }
                }
            }
        }

        writer.finish()
    }

    /// Read the term vectors file of a segment.
    pub fn read_vectors(
        &self,
        storage: &dyn Storage,
        info: &SegmentInfo,
    ) -> Result<SegmentVectors> {
        let name = info.vectors_file();
        let payload = read_verified(storage, &name)?;

        let mut vectors = SegmentVectors::new();
        let mut cur_doc: Option<u64> = None;
        let mut cur_field: Option<String> = None;
        let mut cur_term: Option<String> = None;

        for line in payload.lines() {
            let t = line.trim_start();
            if t.is_empty() {
                continue;
            }

            if let Some(rest) = t.strip_prefix("doc ") {
                let doc_id = parse_num(rest.trim(), &name, "doc id")?;
                vectors.entry(doc_id).or_default();
                cur_doc = Some(doc_id);
                cur_field = None;
                cur_term = None;
            } else if let Some(field) = t.strip_prefix("field ") {
                let doc_id =
                    cur_doc.ok_or_else(|| malformed(&name, "field line outside a doc"))?;
                vectors
                    .get_mut(&doc_id)
                    .expect("current doc was just inserted")
                    .insert(field.to_string(), TermVector::new());
                cur_field = Some(field.to_string());
                cur_term = None;
            } else if let Some(term) = t.strip_prefix("term ") {
                let vector = current_vector(&mut vectors, &cur_doc, &cur_field, &name)?;
                vector.terms.entry(term.to_string()).or_default();
                cur_term = Some(term.to_string());
            } else if let Some(rest) = t.strip_prefix("freq ") {
                let vector = current_vector(&mut vectors, &cur_doc, &cur_field, &name)?;
                let term = cur_term
                    .as_ref()
                    .ok_or_else(|| malformed(&name, "freq line outside a term"))?;
                let freq = parse_num(rest.trim(), &name, "frequency")?;
                vector
                    .terms
                    .get_mut(term)
                    .expect("current term was just inserted")
                    .freq = freq;
            } else if let Some(rest) = t.strip_prefix("position ") {
                let vector = current_vector(&mut vectors, &cur_doc, &cur_field, &name)?;
                let term = cur_term
                    .as_ref()
                    .ok_or_else(|| malformed(&name, "position line outside a term"))?;
                let mut parts = rest.split_whitespace();
                let position = parse_num(parts.next(), &name, "position")?;
                let offsets = match parts.next() {
                    Some("offsets") => {
                        let start = parse_num(parts.next(), &name, "start offset")?;
                        let end = parse_num(parts.next(), &name, "end offset")?;
                        Some(Offset::new(start, end))
                    }
                    Some(other) => return Err(malformed(&name, other)),
                    None => None,
                };
                vector
                    .terms
                    .get_mut(term)
                    .expect("current term was just inserted")
                    .occurrences
                    .push(VectorOccurrence { position, offsets });
            } else {
                return Err(malformed(&name, t));
            }
        }

        // Recorded frequencies must agree with the occurrence lines. A
        // freq-only vector (no occurrence lines at all) is legitimate.
        for fields in vectors.values() {
            for vector in fields.values() {
                for (term, entry) in &vector.terms {
                    if !entry.occurrences.is_empty()
                        && entry.freq as usize != entry.occurrences.len()
                    {
                        return Err(KontosError::index_read(format!(
                            "term vector corrupt in {name}: term '{term}' records freq {} but {} occurrences",
                            entry.freq,
                            entry.occurrences.len()
                        )));
                    }
                }
            }
        }

        Ok(vectors)
    }

    /// Write the stored fields file of a segment.
    pub fn write_stored(
        &self,
        storage: &dyn Storage,
        info: &SegmentInfo,
        stored: &SegmentStored,
    ) -> Result<()> {
        let mut writer = TextFileWriter::create(storage, &info.stored_file())?;

        for (doc_id, fields) in stored {
            writer.line(0, &format!("doc {doc_id}"))?;
            for (field, value) in fields {
                writer.line(1, &format!("field {field}"))?;
                writer.line(2, &format!("value {value}"))?;
            }
        }

        writer.finish()
    }

    /// Read the stored fields file of a segment.
    pub fn read_stored(&self, storage: &dyn Storage, info: &SegmentInfo) -> Result<SegmentStored> {
        let name = info.stored_file();
        let payload = read_verified(storage, &name)?;

        let mut stored = SegmentStored::new();
        let mut cur_doc: Option<u64> = None;
        let mut cur_field: Option<String> = None;

        for line in payload.lines() {
            let t = line.trim_start();
            if t.is_empty() {
                continue;
            }

            if let Some(rest) = t.strip_prefix("doc ") {
                let doc_id = parse_num(rest.trim(), &name, "doc id")?;
                stored.entry(doc_id).or_default();
                cur_doc = Some(doc_id);
                cur_field = None;
            } else if let Some(field) = t.strip_prefix("field ") {
                cur_doc.ok_or_else(|| malformed(&name, "field line outside a doc"))?;
                cur_field = Some(field.to_string());
            } else if t == "value" || t.starts_with("value ") {
                let doc_id =
                    cur_doc.ok_or_else(|| malformed(&name, "value line outside a doc"))?;
                let field = cur_field
                    .as_ref()
                    .ok_or_else(|| malformed(&name, "value line outside a field"))?;
                let value = t.strip_prefix("value ").unwrap_or("");
                stored
                    .get_mut(&doc_id)
                    .expect("current doc was just inserted")
                    .insert(field.clone(), value.to_string());
            } else {
                return Err(malformed(&name, t));
            }
        }

        Ok(stored)
    }
}

/// Writer for one text-codec file, accumulating the checksum as it goes.
struct TextFileWriter {
    out: Box<dyn StorageOutput>,
    hasher: crc32fast::Hasher,
}

impl TextFileWriter {
    fn create(storage: &dyn Storage, name: &str) -> Result<Self> {
        Ok(TextFileWriter {
            out: storage.create_output(name)?,
            hasher: crc32fast::Hasher::new(),
        })
    }

    /// Write one line at the given nesting depth (two spaces per level).
    fn line(&mut self, indent: usize, text: &str) -> Result<()> {
        use std::io::Write;

        let line = format!("{}{text}\n", "  ".repeat(indent));
        self.hasher.update(line.as_bytes());
        self.out.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Append the checksum footer and close the file.
    fn finish(self) -> Result<()> {
        use std::io::Write;

        let TextFileWriter { mut out, hasher } = self;
        let footer = format!("checksum {}\n", hasher.finalize());
        out.write_all(footer.as_bytes())?;
        out.close()?;
        Ok(())
    }
}

/// Read a text-codec file and verify its checksum footer, returning the
/// payload without the footer line.
fn read_verified(storage: &dyn Storage, name: &str) -> Result<String> {
    let mut input = storage.open_input(name)?;
    let mut content = String::new();
    input.read_to_string(&mut content)?;
    input.close()?;

    let split_at = if let Some(i) = content.rfind("\nchecksum ") {
        i + 1
    } else if content.starts_with("checksum ") {
        0
    } else {
        return Err(KontosError::index_read(format!(
            "missing checksum footer in {name}"
        )));
    };

    let (payload, footer) = content.split_at(split_at);
    let expected: u32 = footer
        .trim_end()
        .strip_prefix("checksum ")
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| malformed(name, footer.trim_end()))?;

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(payload.as_bytes());
    let actual = hasher.finalize();

    if actual != expected {
        return Err(KontosError::index_read(format!(
            "checksum mismatch in {name}: expected {expected}, found {actual}"
        )));
    }

    Ok(payload.to_string())
}

fn malformed(file: &str, what: &str) -> KontosError {
    KontosError::index_read(format!("malformed line in {file}: {what}"))
}

fn expect_key(token: Option<&str>, key: &str, file: &str) -> Result<()> {
    match token {
        Some(t) if t == key => Ok(()),
        other => Err(malformed(
            file,
            &format!("expected '{key}', found {other:?}"),
        )),
    }
}

fn parse_num<'a, T, S>(token: S, file: &str, what: &str) -> Result<T>
where
    T: FromStr,
    S: Into<Option<&'a str>>,
{
    let token = token
        .into()
        .ok_or_else(|| malformed(file, &format!("missing {what}")))?;
    token
        .parse()
        .map_err(|_| malformed(file, &format!("invalid {what}: {token}")))
}

fn current<'a>(
    postings: &'a mut SegmentPostings,
    cur_field: &Option<String>,
    file: &str,
) -> Result<&'a mut FieldPostings> {
    let field = cur_field
        .as_ref()
        .ok_or_else(|| malformed(file, "entry outside a field"))?;
    postings
        .get_mut(field)
        .ok_or_else(|| malformed(file, "unknown current field"))
}

fn current_vector<'a>(
    vectors: &'a mut SegmentVectors,
    cur_doc: &Option<u64>,
    cur_field: &Option<String>,
    file: &str,
) -> Result<&'a mut TermVector> {
    let doc_id = cur_doc.ok_or_else(|| malformed(file, "entry outside a doc"))?;
    let field = cur_field
        .as_ref()
        .ok_or_else(|| malformed(file, "entry outside a field"))?;
    vectors
        .get_mut(&doc_id)
        .and_then(|fields| fields.get_mut(field))
        .ok_or_else(|| malformed(file, "unknown current doc/field"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::vector::TermVectorEntry;
    use crate::storage::MemoryStorage;
    use std::collections::BTreeMap;

    fn test_segment() -> SegmentInfo {
        SegmentInfo {
            segment_id: "segment_000000".to_string(),
            doc_count: 1,
            doc_offset: 0,
            generation: 0,
        }
    }

    #[test]
    fn test_postings_roundtrip() {
        let storage = MemoryStorage::default();
        let codec = TextCodec::new();
        let info = test_segment();

        let mut field = FieldPostings::default();
        field.add_document(0, 6);
        field.add_term("ipsum", 0, 2);
        field.add_term("lorem", 0, 1);

        let mut postings = SegmentPostings::new();
        postings.insert("body".to_string(), field);

        codec.write_postings(&storage, &info, &postings).unwrap();
        let back = codec.read_postings(&storage, &info).unwrap();

        assert_eq!(back, postings);
    }

    #[test]
    fn test_postings_term_with_space() {
        let storage = MemoryStorage::default();
        let codec = TextCodec::new();
        let info = test_segment();

        let mut field = FieldPostings::default();
        field.add_document(0, 1);
        field.add_term("doc one", 0, 1);

        let mut postings = SegmentPostings::new();
        postings.insert("doc_id_field".to_string(), field);

        codec.write_postings(&storage, &info, &postings).unwrap();
        let back = codec.read_postings(&storage, &info).unwrap();

        assert!(back["doc_id_field"].terms.contains_key("doc one"));
    }

    #[test]
    fn test_vectors_roundtrip() {
        let storage = MemoryStorage::default();
        let codec = TextCodec::new();
        let info = test_segment();

        let mut vector = TermVector::new();
        vector.add_occurrence(
            "ipsum",
            VectorOccurrence {
                position: 1,
                offsets: Some(Offset::new(8, 13)),
            },
        );
        vector.add_occurrence(
            "ipsum",
            VectorOccurrence {
                position: 5,
                offsets: Some(Offset::new(30, 35)),
            },
        );

        let mut fields = BTreeMap::new();
        fields.insert("body".to_string(), vector);
        let mut vectors = SegmentVectors::new();
        vectors.insert(0, fields);

        codec.write_vectors(&storage, &info, &vectors).unwrap();
        let back = codec.read_vectors(&storage, &info).unwrap();

        assert_eq!(back, vectors);
    }

    #[test]
    fn test_vectors_without_offsets() {
        let storage = MemoryStorage::default();
        let codec = TextCodec::new();
        let info = test_segment();

        let mut vector = TermVector::new();
        vector.add_occurrence(
            "ipsum",
            VectorOccurrence {
                position: 0,
                offsets: None,
            },
        );

        let mut fields = BTreeMap::new();
        fields.insert("body".to_string(), vector);
        let mut vectors = SegmentVectors::new();
        vectors.insert(0, fields);

        codec.write_vectors(&storage, &info, &vectors).unwrap();
        let back = codec.read_vectors(&storage, &info).unwrap();

        let entry = back[&0]["body"].entry("ipsum").unwrap();
        assert_eq!(entry.freq, 1);
        assert_eq!(entry.occurrences[0].offsets, None);
    }

    #[test]
    fn test_vectors_freq_mismatch_rejected() {
        let storage = MemoryStorage::default();
        let codec = TextCodec::new();
        let info = test_segment();

        let mut entry = TermVectorEntry::default();
        entry.freq = 3; // lies about the occurrence count
        entry.occurrences.push(VectorOccurrence {
            position: 0,
            offsets: None,
        });

        let mut vector = TermVector::new();
        vector.terms.insert("ipsum".to_string(), entry);

        let mut fields = BTreeMap::new();
        fields.insert("body".to_string(), vector);
        let mut vectors = SegmentVectors::new();
        vectors.insert(0, fields);

        codec.write_vectors(&storage, &info, &vectors).unwrap();
        assert!(codec.read_vectors(&storage, &info).is_err());
    }

    #[test]
    fn test_stored_roundtrip() {
        let storage = MemoryStorage::default();
        let codec = TextCodec::new();
        let info = test_segment();

        let mut fields = BTreeMap::new();
        fields.insert("doc_id_field".to_string(), "doc one".to_string());
        let mut stored = SegmentStored::new();
        stored.insert(0, fields);

        codec.write_stored(&storage, &info, &stored).unwrap();
        let back = codec.read_stored(&storage, &info).unwrap();

        assert_eq!(back[&0]["doc_id_field"], "doc one");
    }

    #[test]
    fn test_checksum_detects_corruption() {
        use crate::storage::StorageOutput;
        use std::io::Write;

        let storage = MemoryStorage::default();
        let codec = TextCodec::new();
        let info = test_segment();

        codec
            .write_stored(&storage, &info, &SegmentStored::new())
            .unwrap();

        // Corrupt the file in place while keeping the old footer.
        let mut output = storage.create_output(&info.stored_file()).unwrap();
        output.write_all(b"doc 0\nchecksum 12345\n").unwrap();
        output.close().unwrap();

        assert!(codec.read_stored(&storage, &info).is_err());
    }

    #[test]
    fn test_missing_footer_rejected() {
        use crate::storage::StorageOutput;
        use std::io::Write;

        let storage = MemoryStorage::default();
        let codec = TextCodec::new();
        let info = test_segment();

        let mut output = storage.create_output(&info.stored_file()).unwrap();
        output.write_all(b"doc 0\n").unwrap();
        output.close().unwrap();

        assert!(codec.read_stored(&storage, &info).is_err());
    }

    #[test]
    fn test_files_are_human_readable() {
        let storage = MemoryStorage::default();
        let codec = TextCodec::new();
        let info = test_segment();

        let mut field = FieldPostings::default();
        field.add_document(0, 2);
        field.add_term("ipsum", 0, 2);
        let mut postings = SegmentPostings::new();
        postings.insert("body".to_string(), field);

        codec.write_postings(&storage, &info, &postings).unwrap();

        let mut input = storage.open_input(&info.postings_file()).unwrap();
        let mut content = String::new();
        input.read_to_string(&mut content).unwrap();

        assert!(content.starts_with("field body\n"));
        assert!(content.contains("  term ipsum\n"));
        assert!(content.contains("    posting 0 freq 2\n"));
    }
}
