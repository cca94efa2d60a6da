//! Scoring implementations for ranking search results.

/// BM25 scorer.
///
/// Uses the smoothed idf `ln(1 + (N - df + 0.5) / (df + 0.5))`, which
/// stays positive even when every document contains the term — the single
/// document case of a demonstration index.
#[derive(Debug, Clone)]
pub struct BM25Scorer {
    /// Document frequency of the term.
    doc_freq: u64,
    /// Total term frequency across all documents.
    #[allow(dead_code)]
    total_term_freq: u64,
    /// Number of documents containing the field.
    #[allow(dead_code)]
    field_doc_count: u64,
    /// Average field length.
    avg_field_length: f64,
    /// Total number of documents in the index.
    total_docs: u64,
    /// Boost factor.
    boost: f32,
    /// BM25 k1 parameter.
    k1: f32,
    /// BM25 b parameter.
    b: f32,
}

impl BM25Scorer {
    /// Create a new BM25 scorer with the default parameters
    /// (k1 = 1.2, b = 0.75).
    pub fn new(
        doc_freq: u64,
        total_term_freq: u64,
        field_doc_count: u64,
        avg_field_length: f64,
        total_docs: u64,
        boost: f32,
    ) -> Self {
        BM25Scorer {
            doc_freq,
            total_term_freq,
            field_doc_count,
            avg_field_length,
            total_docs,
            boost,
            k1: 1.2,
            b: 0.75,
        }
    }

    /// Calculate the IDF (Inverse Document Frequency) component.
    fn idf(&self) -> f32 {
        if self.doc_freq == 0 || self.total_docs == 0 {
            return 0.0;
        }

        let n = self.total_docs as f32;
        let df = self.doc_freq as f32;

        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// Calculate the TF (Term Frequency) component.
    fn tf(&self, term_freq: f32, field_length: f32) -> f32 {
        if term_freq == 0.0 {
            return 0.0;
        }

        let avg_len = self.avg_field_length as f32;
        let norm_factor = if avg_len > 0.0 {
            1.0 - self.b + self.b * (field_length / avg_len)
        } else {
            1.0
        };

        (term_freq * (self.k1 + 1.0)) / (term_freq + self.k1 * norm_factor)
    }

    /// Score one document given its term frequency and field length.
    pub fn score(&self, term_freq: f32, field_length: f32) -> f32 {
        self.idf() * self.tf(term_freq, field_length) * self.boost
    }

    /// Get the boost factor for this scorer.
    pub fn boost(&self) -> f32 {
        self.boost
    }

    /// Get the k1 parameter.
    pub fn k1(&self) -> f32 {
        self.k1
    }

    /// Get the b parameter.
    pub fn b(&self) -> f32 {
        self.b
    }
}
