/// This crate provides classical document retrieval models and IR evaluation metrics.
pub mod config;
pub mod error;
pub mod evaluate;
pub mod model;
pub mod persist;
pub mod present;
pub mod store;
pub mod utils;
pub mod vectorizer;

/// Text preprocessor
/// Lowercases, cuts word tokens and keeps the purely alphabetic ones that
/// are not stopwords.
/// Every model owns one, so a loaded model analyzes queries exactly as it
/// analyzed the corpus.
pub use vectorizer::analyzer::{Analyzer, Language, StopwordSet};

/// Term Frequency structure
/// Counts the occurrences of each term of one text, in first-seen order.
pub use vectorizer::term::TermFrequency;

/// Vocabulary
/// Dense term <-> id mapping built during fit.
/// A term id is also its column in every document-term matrix.
pub use vectorizer::vocab::Vocabulary;

/// Document-term matrix
/// Dense row-major matrix, rows are documents and columns are vocabulary ids.
/// - `DocTermMatrix<u8>` with `Encoding::Presence` for Boolean retrieval
/// - `DocTermMatrix<u32>` with `Encoding::Count` for BM25
/// - `DocTermMatrix<f64>` holding normalized TF-IDF weights
pub use vectorizer::matrix::{DocTermMatrix, Encoding};

/// Retrieval models
/// - `BooleanModel`: strict conjunction over term presence
/// - `TfIdfModel`: cosine similarity over smoothed TF-IDF weights
/// - `Bm25Model`: Okapi BM25 ranking
///
/// All implement `RetrievalModel`. `Model` wraps any of them when the kind is
/// only known at runtime.
pub use model::{
    bm25::{Bm25Model, Bm25Params},
    boolean::BooleanModel,
    tfidf::TfIdfModel,
    MatchPolicy, Model, ModelKind, RetrievalModel,
};

/// Search results
/// `RankedResult::Ids` for Boolean retrieval, `RankedResult::Scored` otherwise.
pub use model::scoring::{Hit, RankedResult};

/// Document stores
pub use store::{DocumentStore, InMemoryStore};

/// Evaluation
/// `Evaluator` runs a fitted model over every judged query of a `QrelsLookup`
/// and reports P@k, R@k and MAP.
pub use evaluate::{
    qrels::{Qrels, QrelsLookup},
    EvaluationReport, Evaluator, QueryEvaluation,
};

pub use config::Config;
pub use error::{Error, Result};
