use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    scoring::{Hits, RankedResult},
    MatchPolicy, ModelKind, RetrievalModel,
};
use crate::utils::math::{dot, normalize};
use crate::vectorizer::{
    analyzer::Analyzer,
    corpus::CorpusStats,
    matrix::{DocTermMatrix, Encoding},
    term::TermFrequency,
    vocab::Vocabulary,
    TokenizedCorpus,
};

/// Vector space model with cosine ranking.
///
/// Fit:
/// - idf(t) = ln((N + 1) / (df(t) + 1)) + 1
/// - weight(d, t) = count(d, t) * idf(t)
/// - every row is scaled to unit L2 norm (empty documents stay zero)
///
/// Search builds the query vector the same way from the query's own term counts,
/// so the dot product with a row is the cosine similarity.
/// Documents with similarity 0 are not filtered out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TfIdfModel {
    analyzer: Analyzer,
    index: Option<TfIdfIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TfIdfIndex {
    vocabulary: Vocabulary,
    idf: Vec<f64>,
    weights: DocTermMatrix<f64>,
}

impl TfIdfModel {
    /// Unfit model with the English analyzer
    pub fn new() -> Self {
        Self::with_analyzer(Analyzer::english())
    }

    pub fn with_analyzer(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            index: None,
        }
    }

    pub fn idf(&self) -> Option<&[f64]> {
        self.index.as_ref().map(|index| index.idf.as_slice())
    }

    /// Row-normalized weight matrix
    pub fn weights(&self) -> Option<&DocTermMatrix<f64>> {
        self.index.as_ref().map(|index| &index.weights)
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.index.as_ref().map(|index| &index.vocabulary)
    }

    /// Check that idf, weights and vocabulary agree on the term count
    pub fn validate(&self) -> Result<()> {
        let Some(index) = &self.index else {
            return Ok(());
        };
        index.weights.validate()?;
        let terms = index.vocabulary.len();
        if index.idf.len() != terms || index.weights.cols() != terms {
            return Err(Error::Corrupt(format!(
                "tf-idf index has {} idf values and {} weight columns for {} terms",
                index.idf.len(),
                index.weights.cols(),
                terms
            )));
        }
        Ok(())
    }

    /// Unit-norm query vector, `None` when no query term is weighted
    fn query_vector(&self, index: &TfIdfIndex, terms: &[String]) -> Option<Vec<f64>> {
        let mut vector = vec![0.0; index.vocabulary.len()];
        // 語彙にない語は無視
        for (term, count) in TermFrequency::from(terms).iter() {
            if let Some(id) = index.vocabulary.id_of(term) {
                vector[id] = count as f64 * index.idf[id];
            }
        }
        (normalize(&mut vector) > 0.0).then_some(vector)
    }
}

impl RetrievalModel for TfIdfModel {
    fn kind(&self) -> ModelKind {
        ModelKind::TfIdf
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
        let idf = CorpusStats::from_counts(&counts).smoothed_idf();

        let mut weights = counts.map(f64::from);
        for doc in 0..weights.rows() {
            let row = weights.row_mut(doc);
            for (weight, idf) in row.iter_mut().zip(&idf) {
                *weight *= idf;
            }
            normalize(row);
        }

        tracing::info!(
            documents = weights.rows(),
            terms = weights.cols(),
            "tf-idf model fitted"
        );
        self.index = Some(TfIdfIndex {
            vocabulary: tokenized.vocabulary,
            idf,
            weights,
        });
    }

    fn search(&self, query: &str, k: usize) -> RankedResult {
        let Some(index) = &self.index else {
            tracing::warn!("search on an unfit tf-idf model");
            return RankedResult::Scored(Vec::new());
        };
        if k == 0 {
            return RankedResult::Scored(Vec::new());
        }

        let terms = self.analyzer.analyze(query);
        tracing::debug!(?terms, "tf-idf query");
        let Some(query_vector) = self.query_vector(index, &terms) else {
            tracing::debug!("query has no known terms");
            return RankedResult::Scored(Vec::new());
        };

        let scores = index
            .weights
            .par_map_rows(|_, row| dot(row, &query_vector));
        let mut hits = Hits::from_scores(scores);
        hits.sort_by_score().top(k);
        tracing::debug!(hits = hits.list.len(), "tf-idf search done");
        hits.into_result()
    }

    fn is_fitted(&self) -> bool {
        self.index.is_some()
    }

    fn num_documents(&self) -> usize {
        self.index.as_ref().map_or(0, |index| index.weights.rows())
    }

    fn vocabulary_size(&self) -> usize {
        self.index.as_ref().map_or(0, |index| index.vocabulary.len())
    }

    fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::scoring::Hit;
    use crate::utils::math::l2_norm;
    use crate::vectorizer::analyzer::StopwordSet;

    fn fitted(docs: &[&str]) -> TfIdfModel {
        let mut model = TfIdfModel::with_analyzer(Analyzer::new(StopwordSet::from_words(&["the", "and"])));
        model.fit(docs);
        model
    }

    const DOCS: [&str; 3] = ["the cat sat", "dogs run fast", "cats and dogs"];

    #[test]
    fn idf_formula_and_positivity() {
        let model = fitted(&DOCS);
        let idf = model.idf().unwrap();
        let vocab = model.vocabulary().unwrap();
        let dogs = vocab.id_of("dogs").unwrap();
        let cat = vocab.id_of("cat").unwrap();
        assert!((idf[dogs] - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert!((idf[cat] - ((4.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        assert!(idf.iter().all(|&v| v > 0.0));
    }

    #[test]
    fn rows_are_unit_or_zero() {
        let model = fitted(&["the cat sat", "", "the and", "dogs dogs run"]);
        for row in model.weights().unwrap().iter_rows() {
            let norm = l2_norm(row);
            assert!(norm == 0.0 || (norm - 1.0).abs() < 1e-9, "norm {norm}");
        }
    }

    #[test]
    fn zero_similarity_documents_fill_the_tail() {
        let model = fitted(&DOCS);
        let result = model.search("cat", 3);
        let hits = result.hits();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].doc_id, 0);
        assert!(hits[0].score > 0.0);
        // ties at 0 keep ascending id
        assert_eq!(&hits[1..], &[Hit::new(1, 0.0), Hit::new(2, 0.0)]);
    }

    #[test]
    fn identical_document_scores_one() {
        let model = fitted(&["heart disease risk", "lung cancer", "heart"]);
        let hits = model.search("heart disease risk", 1);
        assert_eq!(hits.ids(), vec![0]);
        assert!((hits.hits()[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn scores_are_bounded_and_sorted() {
        let model = fitted(&["a b c", "a a b", "c d", "d d d e", "b e"]);
        let result = model.search("a d d", 5);
        let scores: Vec<f64> = result.hits().iter().map(|h| h.score).collect();
        assert!(scores.iter().all(|&s| (0.0..=1.0 + 1e-12).contains(&s)));
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn unknown_only_query_is_empty() {
        let model = fitted(&DOCS);
        assert!(model.search("unicorn", 3).is_empty());
        assert!(model.search("", 3).is_empty());
    }

    #[test]
    fn unknown_terms_are_ignored() {
        let model = fitted(&DOCS);
        assert_eq!(model.search("cat unicorn", 1), model.search("cat", 1));
    }

    #[test]
    fn validate_catches_truncated_idf() {
        let mut model = fitted(&DOCS);
        assert!(model.validate().is_ok());
        if let Some(index) = model.index.as_mut() {
            index.idf.pop();
        }
        assert!(matches!(model.validate(), Err(Error::Corrupt(_))));
    }

    #[test]
    fn unfit_empty_corpus_and_zero_k() {
        assert!(TfIdfModel::new().search("cat", 3).is_empty());
        assert!(fitted(&[]).search("cat", 3).is_empty());
        assert!(fitted(&DOCS).search("cat", 0).is_empty());
    }
}
