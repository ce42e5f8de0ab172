use serde::{Deserialize, Serialize};

/// One scored document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub doc_id: usize,
    pub score: f64,
}

impl Hit {
    pub fn new(doc_id: usize, score: f64) -> Self {
        Self { doc_id, score }
    }
}

/// Output of every retrieval model.
///
/// Boolean retrieval only knows matching ids, the weighted models carry scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RankedResult {
    /// matching ids, ascending
    Ids(Vec<usize>),
    /// hits, descending score
    Scored(Vec<Hit>),
}

impl RankedResult {
    /// Document ids in rank order
    pub fn ids(&self) -> Vec<usize> {
        match self {
            RankedResult::Ids(ids) => ids.clone(),
            RankedResult::Scored(hits) => hits.iter().map(|hit| hit.doc_id).collect(),
        }
    }

    /// Scored hits, empty for id-only results
    pub fn hits(&self) -> &[Hit] {
        match self {
            RankedResult::Ids(_) => &[],
            RankedResult::Scored(hits) => hits,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RankedResult::Ids(ids) => ids.len(),
            RankedResult::Scored(hits) => hits.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Working list of scored documents before truncation
#[derive(Debug)]
pub struct Hits {
    pub list: Vec<Hit>,
}

impl Hits {
    /// Build from per-document scores, the index is the document id
    pub fn from_scores(scores: Vec<f64>) -> Self {
        Hits {
            list: scores
                .into_iter()
                .enumerate()
                .map(|(doc_id, score)| Hit::new(doc_id, score))
                .collect(),
        }
    }

    /// Sort results by descending score, equal scores by ascending id
    pub fn sort_by_score(&mut self) -> &mut Self {
        // Remove NaN scores
        self.list.retain(|hit| !hit.score.is_nan());
        self.list
            .sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.doc_id.cmp(&b.doc_id)));
        self
    }

    /// Drop hits with score <= 0
    pub fn retain_positive(&mut self) -> &mut Self {
        self.list.retain(|hit| hit.score > 0.0);
        self
    }

    /// Keep the first `k` entries
    pub fn top(&mut self, k: usize) -> &mut Self {
        self.list.truncate(k);
        self
    }

    pub fn into_result(self) -> RankedResult {
        RankedResult::Scored(self.list)
    }
}
