pub mod bm25;
pub mod boolean;
pub mod scoring;
pub mod tfidf;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::DocumentStore;
use crate::vectorizer::analyzer::Analyzer;

use self::bm25::{Bm25Model, Bm25Params};
use self::boolean::BooleanModel;
use self::scoring::RankedResult;
use self::tfidf::TfIdfModel;

/// How a model treats query terms that do not occur in the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// every query term must be present, one unknown term empties the result
    StrictConjunction,
    /// unknown terms are ignored, documents are ranked by partial matches
    SoftWeighted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Boolean,
    #[value(name = "tfidf")]
    TfIdf,
    Bm25,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::Boolean => "boolean",
            ModelKind::TfIdf => "tfidf",
            ModelKind::Bm25 => "bm25",
        };
        f.write_str(name)
    }
}

/// Common interface of the retrieval models.
///
/// A model is created unfit, `fit` builds every derived structure from the corpus
/// (replacing earlier state) and `search` only reads them.
/// Document ids are positions in the fitted corpus.
pub trait RetrievalModel {
    fn kind(&self) -> ModelKind;

    fn policy(&self) -> MatchPolicy;

    /// Build vocabulary, matrices and statistics from `corpus`
    fn fit<S>(&mut self, corpus: &[S])
    where
        S: AsRef<str>;

    /// Top `k` documents for `query`.
    /// Unfit models and `k == 0` give an empty result.
    fn search(&self, query: &str, k: usize) -> RankedResult;

    fn is_fitted(&self) -> bool;

    fn num_documents(&self) -> usize;

    fn vocabulary_size(&self) -> usize;

    fn analyzer(&self) -> &Analyzer;

    /// Fit on every document of a store, in id order
    fn fit_store<D>(&mut self, store: &D)
    where
        D: DocumentStore + ?Sized,
        Self: Sized,
    {
        let texts: Vec<&str> = store.texts().collect();
        self.fit(&texts);
    }
}

/// Any of the three models, chosen at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    Boolean(BooleanModel),
    TfIdf(TfIdfModel),
    Bm25(Bm25Model),
}

impl Model {
    /// Unfit model of the given kind.
    /// `params` only matter for BM25 and are validated there.
    pub fn new(kind: ModelKind, analyzer: Analyzer, params: Bm25Params) -> Result<Self> {
        Ok(match kind {
            ModelKind::Boolean => Model::Boolean(BooleanModel::with_analyzer(analyzer)),
            ModelKind::TfIdf => Model::TfIdf(TfIdfModel::with_analyzer(analyzer)),
            ModelKind::Bm25 => Model::Bm25(Bm25Model::with_analyzer(analyzer, params)?),
        })
    }
}

macro_rules! dispatch {
    ($self:expr, $model:ident => $body:expr) => {
        match $self {
            Model::Boolean($model) => $body,
            Model::TfIdf($model) => $body,
            Model::Bm25($model) => $body,
        }
    };
}

impl RetrievalModel for Model {
    fn kind(&self) -> ModelKind {
        dispatch!(self, m => m.kind())
    }

    fn policy(&self) -> MatchPolicy {
        dispatch!(self, m => m.policy())
    }

    fn fit<S>(&mut self, corpus: &[S])
    where
        S: AsRef<str>,
    {
        dispatch!(self, m => m.fit(corpus))
    }

    fn search(&self, query: &str, k: usize) -> RankedResult {
        dispatch!(self, m => m.search(query, k))
    }

    fn is_fitted(&self) -> bool {
        dispatch!(self, m => m.is_fitted())
    }

    fn num_documents(&self) -> usize {
        dispatch!(self, m => m.num_documents())
    }

    fn vocabulary_size(&self) -> usize {
        dispatch!(self, m => m.vocabulary_size())
    }

    fn analyzer(&self) -> &Analyzer {
        dispatch!(self, m => m.analyzer())
    }
}

impl From<BooleanModel> for Model {
    fn from(model: BooleanModel) -> Self {
        Model::Boolean(model)
    }
}

impl From<TfIdfModel> for Model {
    fn from(model: TfIdfModel) -> Self {
        Model::TfIdf(model)
    }
}

impl From<Bm25Model> for Model {
    fn from(model: Bm25Model) -> Self {
        Model::Bm25(model)
    }
}
