pub mod analyzer;
pub mod corpus;
pub mod matrix;
pub mod stopwords;
pub mod term;
pub mod vocab;

use serde::{Deserialize, Serialize};

use crate::vectorizer::{analyzer::Analyzer, vocab::Vocabulary};

/// Corpus after analysis: the vocabulary plus every document as a list of term ids.
///
/// Document ids are positions in the input slice.
/// Term ids are assigned in first-seen order while walking documents in id order,
/// so fitting the same texts twice gives the same vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenizedCorpus {
    pub vocabulary: Vocabulary,
    pub token_ids: Vec<Vec<usize>>,
}

impl TokenizedCorpus {
    /// Analyze every document and build the vocabulary
    pub fn fit<S>(analyzer: &Analyzer, documents: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        let mut vocabulary = Vocabulary::new();
        let token_ids: Vec<Vec<usize>> = documents
            .iter()
            .map(|doc| {
                analyzer
                    .analyze(doc.as_ref())
                    .iter()
                    .map(|term| vocabulary.insert(term))
                    .collect()
            })
            .collect();
        tracing::info!(
            documents = token_ids.len(),
            vocabulary = vocabulary.len(),
            "corpus tokenized"
        );
        Self {
            vocabulary,
            token_ids,
        }
    }

    #[inline]
    pub fn num_documents(&self) -> usize {
        self.token_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::analyzer::StopwordSet;

    #[test]
    fn vocabulary_is_deterministic() {
        let analyzer = Analyzer::new(StopwordSet::from_words(&["the", "and"]));
        let docs = ["the cat sat", "the dog sat", "cats and dogs"];
        let first = TokenizedCorpus::fit(&analyzer, &docs);
        let second = TokenizedCorpus::fit(&analyzer, &docs);
        assert_eq!(first, second);
        let terms: Vec<&str> = first.vocabulary.iter().map(|(_, t)| t).collect();
        assert_eq!(terms, vec!["cat", "sat", "dog", "cats", "dogs"]);
        assert_eq!(first.token_ids, vec![vec![0, 1], vec![2, 1], vec![3, 4]]);
    }

    #[test]
    fn empty_documents_keep_their_slot() {
        let analyzer = Analyzer::english();
        let corpus = TokenizedCorpus::fit(&analyzer, &["", "the and of", "heart"]);
        assert_eq!(corpus.num_documents(), 3);
        let expected: Vec<Vec<usize>> = vec![vec![], vec![], vec![0]];
        assert_eq!(corpus.token_ids, expected);
        assert_eq!(corpus.vocabulary.len(), 1);
    }
}
