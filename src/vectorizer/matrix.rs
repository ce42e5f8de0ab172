use num::Num;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vectorizer::TokenizedCorpus;

/// Cell encoding used when building a matrix from a tokenized corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// 1 if the term occurs in the document, 0 otherwise
    Presence,
    /// raw number of occurrences
    Count,
}

/// Dense document-term matrix.
///
/// Row `d` is the document at corpus position `d`, column `t` is vocabulary id `t`.
/// Storage is row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocTermMatrix<N> {
    rows: usize,
    cols: usize,
    data: Vec<N>,
}

impl<N> DocTermMatrix<N> {
    /// Check that the stored cells cover exactly (rows x cols)
    pub fn validate(&self) -> Result<()> {
        match self.rows.checked_mul(self.cols) {
            Some(cells) if cells == self.data.len() => Ok(()),
            _ => Err(Error::Corrupt(format!(
                "matrix of shape ({}, {}) holds {} cells",
                self.rows,
                self.cols,
                self.data.len()
            ))),
        }
    }
}

impl<N> DocTermMatrix<N>
where
    N: Num + Copy,
{
    /// Zero-filled matrix of shape (rows x cols)
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![N::zero(); rows * cols],
        }
    }

    /// Build from the term ids of a fitted corpus
    pub fn from_corpus(corpus: &TokenizedCorpus, encoding: Encoding) -> Self {
        let mut matrix = Self::zeros(corpus.num_documents(), corpus.vocabulary.len());
        for (doc, term_ids) in corpus.token_ids.iter().enumerate() {
            let row = matrix.row_mut(doc);
            for &term in term_ids {
                match encoding {
                    Encoding::Presence => row[term] = N::one(),
                    Encoding::Count => row[term] = row[term] + N::one(),
                }
            }
        }
        matrix
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn get(&self, doc: usize, term: usize) -> N {
        self.data[doc * self.cols + term]
    }

    #[inline]
    pub fn row(&self, doc: usize) -> &[N] {
        &self.data[doc * self.cols..(doc + 1) * self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, doc: usize) -> &mut [N] {
        &mut self.data[doc * self.cols..(doc + 1) * self.cols]
    }

    /// Rows in document order
    pub fn iter_rows(&self) -> impl Iterator<Item = &[N]> {
        // chunks_exact(0) panics, index the rows instead
        (0..self.rows).map(move |doc| self.row(doc))
    }

    /// Values of column `term` in document order
    pub fn column(&self, term: usize) -> impl Iterator<Item = N> + '_ {
        (0..self.rows).map(move |doc| self.get(doc, term))
    }

    /// All cells, row-major
    pub fn values(&self) -> &[N] {
        &self.data
    }

    /// Number of documents with a non-zero cell, per column
    pub fn document_frequency(&self) -> Vec<u32> {
        let mut df = vec![0u32; self.cols];
        for row in self.iter_rows() {
            for (count, value) in df.iter_mut().zip(row) {
                if !value.is_zero() {
                    *count += 1;
                }
            }
        }
        df
    }

    /// Element-wise conversion into another cell type
    pub fn map<M, F>(&self, f: F) -> DocTermMatrix<M>
    where
        F: Fn(N) -> M,
    {
        DocTermMatrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&value| f(value)).collect(),
        }
    }

    /// Apply `f` to every row in parallel and collect one value per document
    pub fn par_map_rows<R, F>(&self, f: F) -> Vec<R>
    where
        N: Sync,
        R: Send,
        F: Fn(usize, &[N]) -> R + Sync + Send,
    {
        (0..self.rows)
            .into_par_iter()
            .map(|doc| f(doc, self.row(doc)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::analyzer::{Analyzer, StopwordSet};

    fn corpus() -> TokenizedCorpus {
        let analyzer = Analyzer::new(StopwordSet::from_words(&["the", "and"]));
        TokenizedCorpus::fit(&analyzer, &["the cat sat on the cat", "dogs run", "", "cat and dogs"])
    }

    #[test]
    fn presence_encoding_is_binary() {
        let matrix: DocTermMatrix<u8> = DocTermMatrix::from_corpus(&corpus(), Encoding::Presence);
        assert_eq!(matrix.shape(), (4, 5));
        assert!(matrix.values().iter().all(|&v| v == 0 || v == 1));
        // cat, sat, on
        assert_eq!(matrix.row(0), &[1, 1, 1, 0, 0]);
        assert_eq!(matrix.row(2), &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn count_encoding_accumulates() {
        let matrix: DocTermMatrix<u32> = DocTermMatrix::from_corpus(&corpus(), Encoding::Count);
        assert_eq!(matrix.get(0, 0), 2);
        assert_eq!(matrix.get(3, 0), 1);
        assert_eq!(matrix.column(3).collect::<Vec<_>>(), vec![0, 1, 0, 1]);
    }

    #[test]
    fn document_frequency_counts_rows_not_occurrences() {
        let matrix: DocTermMatrix<u32> = DocTermMatrix::from_corpus(&corpus(), Encoding::Count);
        assert_eq!(matrix.document_frequency(), vec![2, 1, 1, 2, 1]);
    }

    #[test]
    fn zero_column_matrix_still_has_rows() {
        let matrix: DocTermMatrix<f64> = DocTermMatrix::zeros(3, 0);
        assert_eq!(matrix.iter_rows().count(), 3);
        assert!(matrix.iter_rows().all(|row| row.is_empty()));
        assert_eq!(matrix.par_map_rows(|doc, row| doc + row.len()), vec![0, 1, 2]);
    }

    #[test]
    fn validate_rejects_short_storage() {
        let matrix: DocTermMatrix<u32> = DocTermMatrix::from_corpus(&corpus(), Encoding::Count);
        assert!(matrix.validate().is_ok());
        assert!(DocTermMatrix::<u8>::zeros(0, 7).validate().is_ok());

        let broken = DocTermMatrix {
            rows: 4,
            cols: 5,
            data: vec![0u32; 19],
        };
        assert!(matches!(broken.validate(), Err(Error::Corrupt(_))));
        let overflow = DocTermMatrix::<u8> {
            rows: usize::MAX,
            cols: 2,
            data: Vec::new(),
        };
        assert!(overflow.validate().is_err());
    }

    #[test]
    fn map_keeps_shape() {
        let counts: DocTermMatrix<u32> = DocTermMatrix::from_corpus(&corpus(), Encoding::Count);
        let weights = counts.map(|c| c as f64 * 0.5);
        assert_eq!(weights.shape(), counts.shape());
        assert_eq!(weights.get(0, 0), 1.0);
    }
}
