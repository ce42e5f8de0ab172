use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Relevance judgments keyed by the exact query string
pub trait QrelsLookup {
    fn lookup(&self, query: &str) -> Option<&BTreeSet<usize>>;

    /// Judged queries, sorted
    fn queries(&self) -> Vec<&str>;

    /// Relevant ids of `query`, empty when the query is not judged
    fn relevant(&self, query: &str) -> BTreeSet<usize> {
        self.lookup(query).cloned().unwrap_or_default()
    }
}

/// In-memory qrels.
///
/// JSON form: `{ "query text": [doc ids...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Qrels {
    judgments: BTreeMap<String, BTreeSet<usize>>,
}

impl Qrels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let qrels = Self::from_json_str(&raw)?;
        tracing::info!(path = %path.display(), queries = qrels.len(), "loaded qrels");
        Ok(qrels)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Add judged ids to `query`
    pub fn insert<I>(&mut self, query: impl Into<String>, relevant: I)
    where
        I: IntoIterator<Item = usize>,
    {
        self.judgments.entry(query.into()).or_default().extend(relevant);
    }

    /// Number of judged queries
    pub fn len(&self) -> usize {
        self.judgments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.judgments.is_empty()
    }
}

impl QrelsLookup for Qrels {
    fn lookup(&self, query: &str) -> Option<&BTreeSet<usize>> {
        self.judgments.get(query)
    }

    fn queries(&self) -> Vec<&str> {
        self.judgments.keys().map(String::as_str).collect()
    }
}
