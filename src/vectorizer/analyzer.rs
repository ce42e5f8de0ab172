use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::vectorizer::stopwords;

// Runs of letters and digits, joined by inner hyphens or periods ("type-two", "u.s")
static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:[-.][\p{L}\p{N}]+)*").expect("invalid word pattern"));

/// Built-in stopword list selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Spanish,
    /// no built-in list, only user supplied words
    None,
}

/// Set of words excluded from indexing.
/// Words are stored lowercased, matching the analyzer output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StopwordSet {
    words: BTreeSet<String>,
}

impl StopwordSet {
    /// Empty set, every alphabetic token is kept
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn english() -> Self {
        Self::from_words(stopwords::ENGLISH)
    }

    pub fn spanish() -> Self {
        Self::from_words(stopwords::SPANISH)
    }

    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => Self::english(),
            Language::Spanish => Self::spanish(),
            Language::None => Self::empty(),
        }
    }

    /// Build a custom set
    pub fn from_words<T>(words: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        let mut set = Self::empty();
        set.extend(words);
        set
    }

    /// Add more words on top of the current set
    pub fn extend<T>(&mut self, words: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for word in words {
            self.words.insert(word.as_ref().to_lowercase());
        }
        self
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Text preprocessor shared by every retrieval model.
///
/// `analyze` runs, in order:
/// 1. Unicode lowercasing of the whole text
/// 2. cutting word tokens: runs of letters and digits, where an inner `-` or `.`
///    stays part of the token and any other character separates tokens
/// 3. keeping tokens made only of alphabetic characters that are not stopwords
///
/// A hyphenated compound or an abbreviation is therefore one token, and step 3
/// drops it whole.
///
/// Token order and duplicates are preserved, term frequency depends on them.
///
/// # Examples
/// ```
/// use classic_retrieval::{Analyzer, StopwordSet};
/// let analyzer = Analyzer::new(StopwordSet::from_words(&["the", "and"]));
/// assert_eq!(analyzer.analyze("The cat and THE cat2 cat"), vec!["cat", "cat"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Analyzer {
    stopwords: StopwordSet,
}

impl Analyzer {
    pub fn new(stopwords: StopwordSet) -> Self {
        Self { stopwords }
    }

    /// Analyzer with the built-in English stopword list
    pub fn english() -> Self {
        Self::new(StopwordSet::english())
    }

    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    /// Turn raw text into index-eligible terms
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        WORD_PATTERN
            .find_iter(&lowered)
            .map(|word| word.as_str())
            .filter(|token| token.chars().all(char::is_alphabetic))
            .filter(|token| !self.stopwords.contains(token))
            .map(str::to_owned)
            .collect()
    }
}
