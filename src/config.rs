//! Runtime configuration.
//!
//! Layering, later wins:
//! 1. built-in defaults
//! 2. optional TOML file
//! 3. `CLASSIC_RETRIEVAL_*` environment variables, nested keys split on `__`
//!    (`CLASSIC_RETRIEVAL_BM25__K1=1.5`)

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::bm25::Bm25Params;
use crate::vectorizer::analyzer::{Analyzer, Language, StopwordSet};

pub const ENV_PREFIX: &str = "CLASSIC_RETRIEVAL_";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub stopwords: StopwordConfig,
    pub bm25: Bm25Params,
    pub search: SearchConfig,
    pub corpus: CorpusConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StopwordConfig {
    pub language: Language,
    /// words added on top of the built-in list
    pub extra: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// default number of results
    pub k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { k: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// object field holding the document text in JSON corpora
    pub text_field: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            text_field: "answer".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `file` when given, then the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            if !file.is_file() {
                return Err(Error::io(
                    file,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
                ));
            }
            figment = figment.merge(Toml::file(file));
        }
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with a TOML document, environment ignored
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(raw))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.bm25.validate()?;
        if self.search.k == 0 {
            return Err(Error::InvalidParameter("search.k must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Analyzer for the configured stopwords
    pub fn analyzer(&self) -> Analyzer {
        let mut stopwords = StopwordSet::for_language(self.stopwords.language);
        stopwords.extend(self.stopwords.extra.as_slice());
        Analyzer::new(stopwords)
    }
}
