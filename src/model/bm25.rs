use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    scoring::{Hits, RankedResult},
    MatchPolicy, ModelKind, RetrievalModel,
};
use crate::vectorizer::{
    analyzer::Analyzer,
    corpus::CorpusStats,
    matrix::{DocTermMatrix, Encoding},
    vocab::Vocabulary,
    TokenizedCorpus,
};

/// BM25 free parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    /// term frequency saturation
    pub k1: f64,
    /// document length normalization, 0..=1
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

impl Bm25Params {
    pub fn validate(&self) -> Result<()> {
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "bm25 k1 must be finite and non-negative, got {}",
                self.k1
            )));
        }
        if !self.b.is_finite() || !(0.0..=1.0).contains(&self.b) {
            return Err(Error::InvalidParameter(format!(
                "bm25 b must be within [0, 1], got {}",
                self.b
            )));
        }
        Ok(())
    }

    /// Length normalization `k1 * ((1 - b) + b * len / avg_len)`
    #[inline]
    pub fn length_norm(&self, length_ratio: f64) -> f64 {
        self.k1 * ((1.0 - self.b) + self.b * length_ratio)
    }

    /// Contribution of one query term occurrence.
    /// A zero denominator contributes nothing.
    #[inline]
    pub fn term_weight(&self, idf: f64, tf: f64, norm: f64) -> f64 {
        let denom = tf + norm;
        if denom == 0.0 {
            return 0.0;
        }
        idf * (tf * (self.k1 + 1.0)) / denom
    }
}

/// Okapi BM25 ranking.
///
/// idf(t) = ln((N - df + 0.5) / (df + 0.5)), which is not positive for terms
/// found in half of the documents or more. Such terms, like terms outside
/// the vocabulary, are skipped at query time. Only documents with a positive
/// score are returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bm25Model {
    analyzer: Analyzer,
    params: Bm25Params,
    index: Option<Bm25Index>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Bm25Index {
    vocabulary: Vocabulary,
    counts: DocTermMatrix<u32>,
    stats: CorpusStats,
    idf: Vec<f64>,
}

impl Bm25Model {
    /// Unfit model with the English analyzer
    pub fn new(params: Bm25Params) -> Result<Self> {
        Self::with_analyzer(Analyzer::english(), params)
    }

    pub fn with_analyzer(analyzer: Analyzer, params: Bm25Params) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            analyzer,
            params,
            index: None,
        })
    }

    pub fn params(&self) -> Bm25Params {
        self.params
    }

    pub fn idf(&self) -> Option<&[f64]> {
        self.index.as_ref().map(|index| index.idf.as_slice())
    }

    /// Token counts per document
    pub fn lengths(&self) -> Option<&[u32]> {
        self.index.as_ref().map(|index| index.stats.lengths.as_slice())
    }

    pub fn avg_len(&self) -> Option<f64> {
        self.index.as_ref().map(|index| index.stats.avg_len)
    }

    pub fn counts(&self) -> Option<&DocTermMatrix<u32>> {
        self.index.as_ref().map(|index| &index.counts)
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.index.as_ref().map(|index| &index.vocabulary)
    }

    /// Check parameters and the fitted structures.
    ///
    /// Every per-term vector must match the vocabulary and every per-document
    /// vector must match the count matrix rows.
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        let Some(index) = &self.index else {
            return Ok(());
        };
        index.counts.validate()?;
        let terms = index.vocabulary.len();
        if index.counts.cols() != terms || index.idf.len() != terms || index.stats.doc_freq.len() != terms {
            return Err(Error::Corrupt(format!(
                "bm25 index has {} count columns, {} idf values and {} document frequencies for {} terms",
                index.counts.cols(),
                index.idf.len(),
                index.stats.doc_freq.len(),
                terms
            )));
        }
        let docs = index.counts.rows();
        if index.stats.doc_num != docs || index.stats.lengths.len() != docs {
            return Err(Error::Corrupt(format!(
                "bm25 index has {} lengths and N = {} for {} documents",
                index.stats.lengths.len(),
                index.stats.doc_num,
                docs
            )));
        }
        Ok(())
    }
}

impl RetrievalModel for Bm25Model {
    fn kind(&self) -> ModelKind {
        ModelKind::Bm25
    }

    fn policy(&self) -> MatchPolicy {
        MatchPolicy::SoftWeighted
    }

    fn fit<S>(&mut self, corpus: &[S])
    where
        S: AsRef<str>,
    {
        let tokenized = TokenizedCorpus::fit(&self.analyzer, corpus);
        let counts: DocTermMatrix<u32> = DocTermMatrix::from_corpus(&tokenized, Encoding::Count);
        let stats = CorpusStats::from_counts(&counts);
        let idf = stats.probabilistic_idf();

        tracing::info!(
            documents = stats.doc_num,
            terms = counts.cols(),
            avg_len = stats.avg_len,
            "bm25 model fitted"
        );
        self.index = Some(Bm25Index {
            vocabulary: tokenized.vocabulary,
            counts,
            stats,
            idf,
        });
    }

    fn search(&self, query: &str, k: usize) -> RankedResult {
        let Some(index) = &self.index else {
            tracing::warn!("search on an unfit bm25 model");
            return RankedResult::Scored(Vec::new());
        };
        if k == 0 {
            return RankedResult::Scored(Vec::new());
        }

        let terms = self.analyzer.analyze(query);
        // 重複した語はその回数だけ加算する
        let query_ids: Vec<usize> = terms
            .iter()
            .filter_map(|term| index.vocabulary.id_of(term))
            .filter(|&id| index.idf[id] > 0.0)
            .collect();
        tracing::debug!(?terms, weighted = query_ids.len(), "bm25 query");
        if query_ids.is_empty() {
            return RankedResult::Scored(Vec::new());
        }

        let params = self.params;
        let scores = index.counts.par_map_rows(|doc, row| {
            let norm = params.length_norm(index.stats.length_ratio(doc));
            query_ids
                .iter()
                .map(|&id| params.term_weight(index.idf[id], row[id] as f64, norm))
                .sum::<f64>()
        });

        let mut hits = Hits::from_scores(scores);
        hits.sort_by_score().retain_positive().top(k);
        tracing::debug!(hits = hits.list.len(), "bm25 search done");
        hits.into_result()
    }

    fn is_fitted(&self) -> bool {
        self.index.is_some()
    }

    fn num_documents(&self) -> usize {
        self.index.as_ref().map_or(0, |index| index.stats.doc_num)
    }

    fn vocabulary_size(&self) -> usize {
        self.index.as_ref().map_or(0, |index| index.vocabulary.len())
    }

    fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }
}
