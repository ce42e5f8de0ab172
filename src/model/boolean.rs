use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{scoring::RankedResult, MatchPolicy, ModelKind, RetrievalModel};
use crate::vectorizer::{
    analyzer::Analyzer,
    matrix::{DocTermMatrix, Encoding},
    vocab::Vocabulary,
    TokenizedCorpus,
};

/// Boolean retrieval over binary term occurrence.
///
/// A document matches when it contains every query term.
/// A single query term outside the vocabulary empties the result,
/// and a query without terms matches every document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BooleanModel {
    analyzer: Analyzer,
    index: Option<BooleanIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BooleanIndex {
    vocabulary: Vocabulary,
    occurrence: DocTermMatrix<u8>,
}

impl BooleanModel {
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

    /// Occurrence matrix, `None` before fit
    pub fn occurrence(&self) -> Option<&DocTermMatrix<u8>> {
        self.index.as_ref().map(|index| &index.occurrence)
    }

    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.index.as_ref().map(|index| &index.vocabulary)
    }

    /// Check the fitted structures against each other.
    /// Run on every decoded model before it can be searched.
    pub fn validate(&self) -> Result<()> {
        let Some(index) = &self.index else {
            return Ok(());
        };
        index.occurrence.validate()?;
        if index.occurrence.cols() != index.vocabulary.len() {
            return Err(Error::Corrupt(format!(
                "boolean occurrence has {} columns for {} terms",
                index.occurrence.cols(),
                index.vocabulary.len()
            )));
        }
        Ok(())
    }
}

impl RetrievalModel for BooleanModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Boolean
    }

    fn policy(&self) -> MatchPolicy {
        MatchPolicy::StrictConjunction
    }

    fn fit<S>(&mut self, corpus: &[S])
    where
        S: AsRef<str>,
    {
        let tokenized = TokenizedCorpus::fit(&self.analyzer, corpus);
        let occurrence = DocTermMatrix::from_corpus(&tokenized, Encoding::Presence);
        self.index = Some(BooleanIndex {
            vocabulary: tokenized.vocabulary,
            occurrence,
        });
    }

    fn search(&self, query: &str, k: usize) -> RankedResult {
        let Some(index) = &self.index else {
            tracing::warn!("search on an unfit boolean model");
            return RankedResult::Ids(Vec::new());
        };
        if k == 0 {
            return RankedResult::Ids(Vec::new());
        }

        let terms = self.analyzer.analyze(query);
        tracing::debug!(?terms, "boolean query");

        let mut mask = vec![true; index.occurrence.rows()];
        for term in &terms {
            let Some(column) = index.vocabulary.id_of(term) else {
                tracing::debug!(term = term.as_str(), "unknown term, no document can match");
                return RankedResult::Ids(Vec::new());
            };
            for (keep, present) in mask.iter_mut().zip(index.occurrence.column(column)) {
                *keep &= present == 1;
            }
        }

        let ids: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(doc, &keep)| keep.then_some(doc))
            .take(k)
            .collect();
        tracing::debug!(matches = ids.len(), "boolean search done");
        RankedResult::Ids(ids)
    }

    fn is_fitted(&self) -> bool {
        self.index.is_some()
    }

    fn num_documents(&self) -> usize {
        self.index.as_ref().map_or(0, |index| index.occurrence.rows())
    }

    fn vocabulary_size(&self) -> usize {
        self.index.as_ref().map_or(0, |index| index.vocabulary.len())
    }

    fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }
}
