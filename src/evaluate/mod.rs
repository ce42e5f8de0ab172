//! Scoring model output against relevance judgments.

pub mod metrics;
pub mod qrels;

use serde::Serialize;

use crate::model::RetrievalModel;

use self::metrics::{mean, mean_average_precision, QueryMetrics};
use self::qrels::QrelsLookup;

/// Metrics of one judged query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryEvaluation {
    pub query: String,
    /// top `k` of the ranking
    pub retrieved: Vec<usize>,
    pub relevant: usize,
    pub metrics: QueryMetrics,
}

/// Per-query metrics plus their means
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EvaluationReport {
    pub k: usize,
    pub queries: Vec<QueryEvaluation>,
    pub mean_precision_at_k: f64,
    pub mean_recall_at_k: f64,
    pub map: f64,
}

/// Runs a fitted model over judged queries
pub struct Evaluator<'a, M, Q>
where
    M: RetrievalModel,
    Q: QrelsLookup,
{
    model: &'a M,
    qrels: &'a Q,
}

impl<'a, M, Q> Evaluator<'a, M, Q>
where
    M: RetrievalModel,
    Q: QrelsLookup,
{
    pub fn new(model: &'a M, qrels: &'a Q) -> Self {
        Self { model, qrels }
    }

    /// `None` when `query` has no judgments.
    ///
    /// Precision and recall use the top `k`. Average precision uses the model's
    /// whole ranking, so MAP does not depend on the cutoff.
    pub fn evaluate_query(&self, query: &str, k: usize) -> Option<QueryEvaluation> {
        let relevant = self.qrels.lookup(query)?;
        let depth = self.model.num_documents().max(k);
        let mut retrieved = self.model.search(query, depth).ids();
        let metrics = QueryMetrics::compute(&retrieved, relevant, k);
        retrieved.truncate(k);
        tracing::debug!(query, ?metrics, "query evaluated");
        Some(QueryEvaluation {
            query: query.to_string(),
            retrieved,
            relevant: relevant.len(),
            metrics,
        })
    }

    /// Every judged query, in sorted order
    pub fn evaluate_all(&self, k: usize) -> EvaluationReport {
        let queries: Vec<QueryEvaluation> = self
            .qrels
            .queries()
            .into_iter()
            .filter_map(|query| self.evaluate_query(query, k))
            .collect();

        let column = |f: fn(&QueryMetrics) -> f64| -> Vec<f64> {
            queries.iter().map(|q| f(&q.metrics)).collect()
        };
        let report = EvaluationReport {
            k,
            mean_precision_at_k: mean(&column(|m| m.precision_at_k)),
            mean_recall_at_k: mean(&column(|m| m.recall_at_k)),
            map: mean_average_precision(&column(|m| m.average_precision)),
            queries,
        };
        tracing::info!(
            queries = report.queries.len(),
            map = report.map,
            "evaluation finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate::qrels::Qrels;
    use crate::model::boolean::BooleanModel;
    use crate::model::tfidf::TfIdfModel;
    use crate::vectorizer::analyzer::{Analyzer, StopwordSet};

    fn model() -> BooleanModel {
        let mut model = BooleanModel::with_analyzer(Analyzer::new(StopwordSet::from_words(&["the", "and"])));
        model.fit(&["the cat sat", "dogs run fast", "cats and dogs"]);
        model
    }

    #[test]
    fn unjudged_query_is_skipped() {
        let model = model();
        let qrels = Qrels::new();
        let evaluator = Evaluator::new(&model, &qrels);
        assert!(evaluator.evaluate_query("cat", 3).is_none());
        let report = evaluator.evaluate_all(3);
        assert!(report.queries.is_empty());
        assert_eq!(report.map, 0.0);
    }

    #[test]
    fn report_means() {
        let model = model();
        let mut qrels = Qrels::new();
        // perfect
        qrels.insert("dogs", [1, 2]);
        // nothing relevant retrieved
        qrels.insert("cat", [2]);
        let report = Evaluator::new(&model, &qrels).evaluate_all(2);

        assert_eq!(report.queries.len(), 2);
        assert_eq!(report.queries[0].query, "cat");
        assert_eq!(report.queries[0].retrieved, vec![0]);
        assert_eq!(report.queries[1].metrics.precision_at_k, 1.0);
        assert_eq!(report.queries[1].metrics.average_precision, 1.0);
        assert!((report.mean_precision_at_k - 0.5).abs() < 1e-12);
        assert!((report.mean_recall_at_k - 0.5).abs() < 1e-12);
        assert!((report.map - 0.5).abs() < 1e-12);
    }

    #[test]
    fn average_precision_looks_past_the_cutoff() {
        let mut model = TfIdfModel::with_analyzer(Analyzer::new(StopwordSet::empty()));
        model.fit(&["cat sat", "cat", "birds fly"]);
        let mut qrels = Qrels::new();
        qrels.insert("cat", [2]);

        let entry = Evaluator::new(&model, &qrels).evaluate_query("cat", 1).unwrap();
        assert_eq!(entry.retrieved, vec![1]);
        assert_eq!(entry.metrics.precision_at_k, 0.0);
        assert_eq!(entry.metrics.recall_at_k, 0.0);
        // third in the full ranking
        assert!((entry.metrics.average_precision - 1.0 / 3.0).abs() < 1e-12);
    }
}
