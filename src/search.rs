//! Searching an index with term queries.

use crate::error::Result;
use crate::index::reader::IndexReader;
use crate::query::scorer::BM25Scorer;
use crate::query::term::TermQuery;

/// A single search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Document ID of the hit.
    pub doc_id: u64,
    /// BM25 score of the hit.
    pub score: f32,
}

/// Evaluates term queries against an open [`IndexReader`].
#[derive(Debug)]
pub struct Searcher<'a> {
    reader: &'a IndexReader,
}

impl<'a> Searcher<'a> {
    /// Create a searcher over `reader`.
    pub fn new(reader: &'a IndexReader) -> Self {
        Searcher { reader }
    }

    /// Run `query`, returning up to `limit` hits ordered by descending
    /// score (ties broken by ascending document ID). A term or field
    /// absent from the index yields no hits, not an error.
    pub fn search(&self, query: &TermQuery, limit: usize) -> Result<Vec<SearchHit>> {
        let Some(postings) = self.reader.postings(query.field(), query.term()) else {
            return Ok(Vec::new());
        };
        let Some(stats) = self.reader.field_stats(query.field()) else {
            return Ok(Vec::new());
        };

        let scorer = BM25Scorer::new(
            postings.doc_freq(),
            postings.total_freq(),
            stats.doc_count,
            stats.avg_length,
            self.reader.doc_count(),
            query.boost(),
        );

        let mut hits: Vec<SearchHit> = postings
            .iter()
            .map(|posting| {
                let field_length = self
                    .reader
                    .field_length(posting.doc_id, query.field())
                    .unwrap_or(0);
                SearchHit {
                    doc_id: posting.doc_id,
                    score: scorer.score(posting.frequency as f32, field_length as f32),
                }
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.doc_id.cmp(&b.doc_id))
        });
        hits.truncate(limit);

        Ok(hits)
    }
}
