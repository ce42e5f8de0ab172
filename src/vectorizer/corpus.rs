use serde::{Deserialize, Serialize};

use crate::vectorizer::matrix::DocTermMatrix;

/// Corpus-level statistics shared by the weighted models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CorpusStats {
    /// number of documents, N
    pub doc_num: usize,
    /// documents containing each vocabulary term, indexed by term id
    pub doc_freq: Vec<u32>,
    /// analyzed token count per document
    pub lengths: Vec<u32>,
    /// mean of `lengths`, 0 for an empty corpus
    pub avg_len: f64,
}

impl CorpusStats {
    /// Collect statistics from a count matrix.
    /// Lengths are row sums, so tokens outside the vocabulary never count.
    pub fn from_counts(counts: &DocTermMatrix<u32>) -> Self {
        let lengths: Vec<u32> = counts.iter_rows().map(|row| row.iter().sum()).collect();
        let doc_num = counts.rows();
        let avg_len = if doc_num == 0 {
            0.0
        } else {
            lengths.iter().map(|&len| len as f64).sum::<f64>() / doc_num as f64
        };
        Self {
            doc_num,
            doc_freq: counts.document_frequency(),
            lengths,
            avg_len,
        }
    }

    /// Smoothed idf, `ln((N + 1) / (df + 1)) + 1`.
    /// Always strictly positive.
    pub fn smoothed_idf(&self) -> Vec<f64> {
        let n = self.doc_num as f64;
        self.doc_freq
            .iter()
            .map(|&df| ((n + 1.0) / (df as f64 + 1.0)).ln() + 1.0)
            .collect()
    }

    /// Probabilistic idf, `ln((N - df + 0.5) / (df + 0.5))`.
    /// Negative for terms present in more than half of the documents.
    pub fn probabilistic_idf(&self) -> Vec<f64> {
        let n = self.doc_num as f64;
        self.doc_freq
            .iter()
            .map(|&df| {
                let df = df as f64;
                ((n - df + 0.5) / (df + 0.5)).ln()
            })
            .collect()
    }

    /// len / avg_len, 0 when the corpus has no tokens at all
    #[inline]
    pub fn length_ratio(&self, doc: usize) -> f64 {
        if self.avg_len > 0.0 {
            self.lengths[doc] as f64 / self.avg_len
        } else {
            0.0
        }
    }
}
