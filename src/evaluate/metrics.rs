//! Set-based retrieval metrics.
//!
//! - Precision@k and Recall@k over the first `k` retrieved ids
//! - Average Precision over the whole ranked list
//! - Mean Average Precision across queries
//!
//! Relevance is binary: an id is relevant when it is in the judged set.
//! Duplicate ids in a ranked list are counted as many times as they appear.

use std::collections::BTreeSet;

use serde::Serialize;

/// Metrics of one query at cutoff `k`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct QueryMetrics {
    pub precision_at_k: f64,
    pub recall_at_k: f64,
    pub average_precision: f64,
}

impl QueryMetrics {
    /// Computes all metrics for one ranked list.
    ///
    /// # Arguments
    ///
    /// * `retrieved` - Ranked document ids, best first
    /// * `relevant` - Ground truth relevant ids
    /// * `k` - Cutoff for precision and recall
    pub fn compute(retrieved: &[usize], relevant: &BTreeSet<usize>, k: usize) -> Self {
        Self {
            precision_at_k: precision_at_k(retrieved, relevant, k),
            recall_at_k: recall_at_k(retrieved, relevant, k),
            average_precision: average_precision(retrieved, relevant),
        }
    }
}

fn hits_at_k(retrieved: &[usize], relevant: &BTreeSet<usize>, k: usize) -> usize {
    retrieved
        .iter()
        .take(k)
        .filter(|&&id| relevant.contains(&id))
        .count()
}

/// Fraction of the first `k` slots holding a relevant id.
///
/// The denominator is `k` even when fewer than `k` ids were retrieved.
/// Returns 0.0 for an empty list or `k == 0`.
pub fn precision_at_k(retrieved: &[usize], relevant: &BTreeSet<usize>, k: usize) -> f64 {
    if retrieved.is_empty() || k == 0 {
        return 0.0;
    }
    hits_at_k(retrieved, relevant, k) as f64 / k as f64
}

/// Fraction of the relevant ids found in the first `k` slots.
///
/// Returns 0.0 when nothing is relevant.
pub fn recall_at_k(retrieved: &[usize], relevant: &BTreeSet<usize>, k: usize) -> f64 {
    if relevant.is_empty() {
        return 0.0;
    }
    hits_at_k(retrieved, relevant, k) as f64 / relevant.len() as f64
}

/// Average Precision of one ranked list.
///
/// ```text
/// AP = (1 / |relevant|) * Σ_{i: retrieved[i] ∈ relevant} hits(0..=i) / (i + 1)
/// ```
///
/// Computed over the full list, not a cutoff. Returns 0.0 when nothing is
/// relevant or nothing relevant was retrieved.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use classic_retrieval::evaluate::metrics::average_precision;
///
/// let relevant = BTreeSet::from([2, 4]);
/// let ap = average_precision(&[5, 2, 4], &relevant);
/// assert!((ap - 7.0 / 12.0).abs() < 1e-12);
/// ```
pub fn average_precision(retrieved: &[usize], relevant: &BTreeSet<usize>) -> f64 {
    if relevant.is_empty() {
        return 0.0;
    }
    let mut hits = 0usize;
    let mut sum = 0.0;
    for (rank, id) in retrieved.iter().enumerate() {
        if relevant.contains(id) {
            hits += 1;
            sum += hits as f64 / (rank + 1) as f64;
        }
    }
    if hits == 0 {
        return 0.0;
    }
    sum / relevant.len() as f64
}

/// Arithmetic mean of per-query AP, 0.0 for no queries
pub fn mean_average_precision(per_query: &[f64]) -> f64 {
    mean(per_query)
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
