//! End-to-end demonstration driver.
//!
//! Builds a one-document index over a fixed sample text, runs a
//! single-term query against it, and prints the term's offsets twice —
//! once read back from the persisted term vector, once recomputed from
//! the analyzer — followed by every token in the field's term dictionary.
//! The two offset listings coming out identical is the point.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::analysis::analyzer::{Analyzer, KeywordAnalyzer, PerFieldAnalyzer, StandardAnalyzer};
use crate::document::{Document, IndexOptions, TermVectorOptions, TextOption};
use crate::error::Result;
use crate::index::reader::IndexReader;
use crate::index::writer::{IndexWriter, IndexWriterConfig};
use crate::offsets::{DynamicOffsets, IndexedOffsets, OffsetSource};
use crate::query::parser::QueryParser;
use crate::search::Searcher;
use crate::storage::{FileStorage, Storage, StorageConfig};

/// Configuration record for one demonstration run.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Directory holding the index.
    pub index_dir: PathBuf,
    /// Name of the analyzed body field.
    pub field_name: String,
    /// Name of the identifier field.
    pub id_field_name: String,
    /// Value of the identifier field.
    pub id_value: String,
    /// The sample text to index.
    pub text: String,
    /// The term to search for.
    pub search_term: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            index_dir: PathBuf::from("./index"),
            field_name: "body".to_string(),
            id_field_name: "doc_id_field".to_string(),
            id_value: "doc one".to_string(),
            text: "Lorem - ipsum dolor, sit amet ipsum".to_string(),
            search_term: "ipsum".to_string(),
        }
    }
}

/// The analyzer shared by indexing, query parsing, and dynamic offsets:
/// standard analysis by default, the identifier field kept whole.
pub fn demo_analyzer(config: &DemoConfig) -> Result<Arc<dyn Analyzer>> {
    let mut analyzer = PerFieldAnalyzer::new(Arc::new(StandardAnalyzer::new()?));
    analyzer.add_analyzer(config.id_field_name.as_str(), Arc::new(KeywordAnalyzer::new()));
    Ok(Arc::new(analyzer))
}

/// Create or truncate the index at `config.index_dir` and write the one
/// demonstration document.
pub fn build_index(config: &DemoConfig) -> Result<()> {
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(
        &config.index_dir,
        StorageConfig::default(),
    )?);

    let mut writer = IndexWriter::create(
        storage,
        IndexWriterConfig {
            analyzer: demo_analyzer(config)?,
            ..Default::default()
        },
    )?;

    let doc = Document::builder()
        .add_text(
            config.id_field_name.as_str(),
            config.id_value.as_str(),
            TextOption::stored_only(),
        )
        .add_text(
            config.field_name.as_str(),
            config.text.as_str(),
            TextOption {
                stored: false,
                index_options: IndexOptions::Docs,
                term_vectors: TermVectorOptions::WithPositionsOffsets,
            },
        )
        .build();

    writer.add_document(doc)?;
    writer.close()?;
    Ok(())
}

/// Run the full demonstration, writing its transcript to `out`.
pub fn run(config: &DemoConfig, out: &mut dyn Write) -> Result<()> {
    build_index(config)?;

    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(
        &config.index_dir,
        StorageConfig::default(),
    )?);
    let analyzer = demo_analyzer(config)?;

    // Search and indexed offsets.
    let reader = IndexReader::open(Arc::clone(&storage))?;
    let parser =
        QueryParser::new(Arc::clone(&analyzer)).with_default_field(config.field_name.as_str());
    let query = parser.parse(&config.search_term)?;

    writeln!(out)?;
    writeln!(out, "Search term: [{}]", config.search_term)?;
    writeln!(out, "Parsed query: [{query}]")?;

    let searcher = Searcher::new(&reader);
    for hit in searcher.search(&query, 100)? {
        writeln!(out)?;
        writeln!(out, "Found:")?;
        let id = reader
            .stored_field(hit.doc_id, &config.id_field_name)
            .unwrap_or("");
        writeln!(out, "{} - {id:<10}", format_score(hit.score))?;

        let indexed = IndexedOffsets::new(Arc::clone(&storage), hit.doc_id);
        for offset in indexed.offsets(&config.field_name, query.term())? {
            writeln!(out, "  > offset: {offset}")?;
        }
    }

    // Dynamic offsets over the same text, no index involved.
    writeln!(out)?;
    writeln!(out, "token: {}", config.search_term)?;
    let dynamic = DynamicOffsets::new(analyzer, config.text.as_str());
    for offset in dynamic.offsets(&config.field_name, &config.search_term)? {
        writeln!(out, "  > offset: {offset}")?;
    }

    // Every token in the field's term dictionary, per leaf segment.
    writeln!(out)?;
    for leaf in reader.leaves() {
        if let Some(terms) = leaf.terms(&config.field_name) {
            for term in terms {
                writeln!(out, "{term}")?;
            }
        }
    }

    Ok(())
}

/// Format a score at width 7 with three decimals, ties rounded to even.
fn format_score(score: f32) -> String {
    let rounded = (f64::from(score) * 1000.0).round_ties_even() / 1000.0;
    format!("{rounded:7.3}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score_width_and_precision() {
        assert_eq!(format_score(0.2876821), "  0.288");
        assert_eq!(format_score(12.3456), " 12.346");
        assert_eq!(format_score(0.0), "  0.000");
    }

    #[test]
    fn test_format_score_rounds_ties_to_even() {
        assert_eq!(format_score(0.0625), "  0.062");
        assert_eq!(format_score(0.1875), "  0.188");
    }

    #[test]
    fn test_demo_config_defaults() {
        let config = DemoConfig::default();
        assert_eq!(config.index_dir, PathBuf::from("./index"));
        assert_eq!(config.field_name, "body");
        assert_eq!(config.id_field_name, "doc_id_field");
        assert_eq!(config.id_value, "doc one");
        assert_eq!(config.text, "Lorem - ipsum dolor, sit amet ipsum");
        assert_eq!(config.search_term, "ipsum");
    }
}
