use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the fallible edges of the crate:
/// loading corpora and qrels, model persistence, configuration and
/// parameter validation.
///
/// Fitting and searching never fail; degenerate inputs yield empty results.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O failure on a specific path
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// JSON corpus or qrels could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// CSV corpus could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// CBOR model file could not be encoded or decoded
    #[error("model encoding error: {0}")]
    Cbor(#[from] serde_cbor::Error),
    /// Configuration could not be extracted
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
    /// Model file was written by a newer schema
    #[error("unsupported model format version {found} (supported up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    /// A stored model could not be migrated to the current schema
    #[error("model migration failed: {0}")]
    Migration(String),
    /// A decoded model has inconsistent structure
    #[error("corrupt model: {0}")]
    Corrupt(String),
    /// A model or configuration parameter is out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Corpus source is malformed
    #[error("corpus error: {0}")]
    Corpus(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
