use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// TermFrequency struct
/// Counts how many times each term occurs in one text.
/// Terms keep their first-seen order.
///
/// # Examples
/// ```
/// use classic_retrieval::TermFrequency;
/// let mut term_freq = TermFrequency::new();
/// term_freq.add_term("term1");
/// term_freq.add_term("term2");
/// term_freq.add_term("term1");
///
/// let counts: Vec<(&str, u32)> = term_freq.iter().collect();
/// assert_eq!(counts, vec![("term1", 2), ("term2", 1)]);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFrequency {
    counts: IndexMap<String, u32>,
}

impl TermFrequency {
    /// Create a new TermFrequency
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        *self.counts.entry(term.to_string()).or_insert(0) += 1;
        self
    }

    /// Add multiple terms
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// Iterator over (term, count) in first-seen order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(term, &count)| (term.as_str(), count))
    }
}

impl<T> From<&[T]> for TermFrequency
where
    T: AsRef<str>,
{
    fn from(terms: &[T]) -> Self {
        let mut tf = TermFrequency::new();
        tf.add_terms(terms);
        tf
    }
}
