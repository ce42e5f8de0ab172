use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Bidirectional term <-> column id mapping.
///
/// Ids are dense, 0-based and assigned in first-seen order,
/// so the id of a term is also its matrix column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: IndexSet<Box<str>>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `term` if unseen and return its id
    pub fn insert(&mut self, term: &str) -> usize {
        match self.terms.get_index_of(term) {
            Some(id) => id,
            None => self.terms.insert_full(Box::from(term)).0,
        }
    }

    /// Column id of `term`
    #[inline]
    pub fn id_of(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    /// Term stored at column `id`
    #[inline]
    pub fn term(&self, id: usize) -> Option<&str> {
        self.terms.get_index(id).map(|term| term.as_ref())
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// (id, term) pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.terms.iter().enumerate().map(|(id, term)| (id, term.as_ref()))
    }
}
