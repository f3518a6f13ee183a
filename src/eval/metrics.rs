//! Recall@M over a ground-truth matrix and a same-shaped score matrix.
//!
//! For every row the columns are ranked by score (stable, descending), the
//! top M are compared with the row's positives, and `hits / positives` is
//! averaged over rows that have at least one positive. Rows without positives
//! are left out of both the sum and the count rather than scored as zero.

use super::observer::{EvalObserver, NoopObserver};
use super::ranking::rank_top_m;
use crate::config::EvalConfig;
use crate::error::{CitevalError, Result};
use crate::matrix::{is_positive, InteractionMatrix};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome for a single row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRecall {
    pub row: usize,
    /// Number of 1s in the ground-truth row.
    pub positives: usize,
    /// Positives found among the top-M ranked columns.
    pub hits: usize,
    /// `hits / positives`, or `None` when the row has no positives.
    pub recall: Option<f64>,
}

/// Result of one evaluation call.
#[derive(Debug, Clone, Serialize)]
pub struct RecallReport {
    pub m: usize,
    pub rows: usize,
    pub cols: usize,
    /// Rows with at least one positive.
    pub eligible_rows: usize,
    pub mean_recall: f64,
    pub evaluated_at: DateTime<Utc>,
    pub per_row: Vec<RowRecall>,
}

impl RecallReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Score one row: rank `scores`, take the top `m`, count positives of `truth`
/// among them.
pub fn row_recall(row: usize, truth: &[f64], scores: &[f64], m: usize) -> RowRecall {
    let positives = truth.iter().filter(|&&v| is_positive(v)).count();
    let hits = if positives == 0 {
        0
    } else {
        rank_top_m(scores, m)
            .into_iter()
            .filter(|&col| is_positive(truth[col]))
            .count()
    };
    let recall = (positives > 0).then(|| hits as f64 / positives as f64);
    RowRecall {
        row,
        positives,
        hits,
        recall,
    }
}

/// Recall@M evaluator.
#[derive(Debug, Clone)]
pub struct RecallEvaluator {
    m: usize,
    parallel: bool,
}

impl RecallEvaluator {
    /// Sequential evaluator for a positive `m`.
    pub fn new(m: usize) -> Result<Self> {
        if m == 0 {
            return Err(CitevalError::InvalidInput("M must be greater than 0".to_string()));
        }
        Ok(Self { m, parallel: false })
    }

    pub fn from_config(config: &EvalConfig) -> Result<Self> {
        Ok(Self::new(config.m)?.with_parallel(config.parallel))
    }

    /// Evaluate rows on the rayon pool. Ignored when built without the
    /// `parallel` feature.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn m(&self) -> usize {
        self.m
    }

    /// Mean recall@M only.
    pub fn recall_at_m(
        &self,
        ground_truth: &InteractionMatrix,
        predictions: &InteractionMatrix,
    ) -> Result<f64> {
        Ok(self.evaluate(ground_truth, predictions)?.mean_recall)
    }

    pub fn evaluate(
        &self,
        ground_truth: &InteractionMatrix,
        predictions: &InteractionMatrix,
    ) -> Result<RecallReport> {
        self.evaluate_with(ground_truth, predictions, &NoopObserver)
    }

    /// Full evaluation with per-row results, reporting each row to `observer`.
    ///
    /// Fails with `ShapeMismatch` before touching any row, with `Cancelled` if
    /// the observer asks to stop, and with `NoEligibleRows` when no row has a
    /// positive.
    pub fn evaluate_with(
        &self,
        ground_truth: &InteractionMatrix,
        predictions: &InteractionMatrix,
        observer: &dyn EvalObserver,
    ) -> Result<RecallReport> {
        if ground_truth.shape() != predictions.shape() {
            return Err(CitevalError::ShapeMismatch {
                expected: ground_truth.shape(),
                actual: predictions.shape(),
            });
        }
        let (rows, cols) = ground_truth.shape();
        let m = self.m;

        let eval_row = |r: usize| -> Result<RowRecall> {
            if observer.is_cancelled() {
                return Err(CitevalError::Cancelled { row: r });
            }
            let result = row_recall(r, ground_truth.row(r), predictions.row(r), m);
            observer.on_row(&result);
            Ok(result)
        };
        let per_row = self.collect_rows(rows, eval_row)?;

        // Summed in row order so parallel and sequential runs agree exactly
        let (sum, eligible_rows) = per_row
            .iter()
            .filter_map(|r| r.recall)
            .fold((0.0_f64, 0usize), |(sum, n), recall| (sum + recall, n + 1));
        if eligible_rows == 0 {
            return Err(CitevalError::NoEligibleRows);
        }
        let mean_recall = sum / eligible_rows as f64;

        log::debug!(
            "Recall@{} = {:.4} over {} of {} rows",
            m,
            mean_recall,
            eligible_rows,
            rows
        );

        Ok(RecallReport {
            m,
            rows,
            cols,
            eligible_rows,
            mean_recall,
            evaluated_at: Utc::now(),
            per_row,
        })
    }

    #[cfg(feature = "parallel")]
    fn collect_rows<F>(&self, rows: usize, eval_row: F) -> Result<Vec<RowRecall>>
    where
        F: Fn(usize) -> Result<RowRecall> + Sync + Send,
    {
        use rayon::prelude::*;
        if self.parallel {
            (0..rows).into_par_iter().map(eval_row).collect()
        } else {
            (0..rows).map(eval_row).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn collect_rows<F>(&self, rows: usize, eval_row: F) -> Result<Vec<RowRecall>>
    where
        F: Fn(usize) -> Result<RowRecall> + Sync + Send,
    {
        if self.parallel {
            log::debug!("Built without the parallel feature; evaluating rows sequentially");
        }
        (0..rows).map(eval_row).collect()
    }
}

/// Mean recall@M of `predictions` against `ground_truth`.
pub fn recall_at_m(
    ground_truth: &InteractionMatrix,
    predictions: &InteractionMatrix,
    m: usize,
) -> Result<f64> {
    RecallEvaluator::new(m)?.recall_at_m(ground_truth, predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn matrix(rows: Vec<Vec<f64>>) -> InteractionMatrix {
        InteractionMatrix::from_rows(rows).unwrap()
    }

    fn scenario() -> (InteractionMatrix, InteractionMatrix) {
        (
            matrix(vec![vec![1.0, 0.0, 1.0], vec![0.0, 0.0, 0.0]]),
            matrix(vec![vec![0.9, 0.1, 0.8], vec![0.5, 0.5, 0.5]]),
        )
    }

    /// Deterministic pseudo-random ground truth and scores.
    fn random_pair(rows: usize, cols: usize, seed: u64) -> (InteractionMatrix, InteractionMatrix) {
        let mut state = seed;
        let mut next = || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 33) as f64 / (1u64 << 31) as f64
        };
        let mut truth = InteractionMatrix::zeros(rows, cols);
        let mut scores = InteractionMatrix::zeros(rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                if next() < 0.2 {
                    truth.mark(r, c).unwrap();
                }
                // Coarse buckets so ties are common
                scores.set(r, c, (next() * 8.0).floor()).unwrap();
            }
        }
        (truth, scores)
    }

    #[test]
    fn test_top_one_scenario() {
        let (g, p) = scenario();
        let report = RecallEvaluator::new(1).unwrap().evaluate(&g, &p).unwrap();
        assert_eq!(report.per_row[0].positives, 2);
        assert_eq!(report.per_row[0].hits, 1);
        assert_eq!(report.per_row[0].recall, Some(0.5));
        assert_eq!(report.per_row[1].recall, None);
        assert_eq!(report.eligible_rows, 1);
        assert!((report.mean_recall - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_m_equal_to_columns() {
        let (g, p) = scenario();
        assert!((recall_at_m(&g, &p, 3).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_m_beyond_columns() {
        let (g, p) = scenario();
        assert!((recall_at_m(&g, &p, 50).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ties_resolved_by_column_order() {
        let g = matrix(vec![vec![0.0, 1.0, 0.0]]);
        let p = matrix(vec![vec![0.5, 0.5, 0.5]]);
        assert_eq!(recall_at_m(&g, &p, 1).unwrap(), 0.0);
        assert_eq!(recall_at_m(&g, &p, 2).unwrap(), 1.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let g = matrix(vec![vec![1.0, 0.0]]);
        let p = matrix(vec![vec![1.0], vec![0.0]]);
        let calls = Counting::default();
        let err = RecallEvaluator::new(1)
            .unwrap()
            .evaluate_with(&g, &p, &calls)
            .unwrap_err();
        assert!(matches!(
            err,
            CitevalError::ShapeMismatch {
                expected: (1, 2),
                actual: (2, 1)
            }
        ));
        assert_eq!(calls.rows.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_no_eligible_rows() {
        let g = InteractionMatrix::zeros(2, 3);
        let p = matrix(vec![vec![0.1, 0.2, 0.3], vec![0.3, 0.2, 0.1]]);
        assert!(matches!(
            recall_at_m(&g, &p, 2).unwrap_err(),
            CitevalError::NoEligibleRows
        ));
        let empty = InteractionMatrix::zeros(0, 0);
        assert!(matches!(
            recall_at_m(&empty, &empty, 2).unwrap_err(),
            CitevalError::NoEligibleRows
        ));
    }

    #[test]
    fn test_zero_m_rejected() {
        assert!(matches!(
            RecallEvaluator::new(0).unwrap_err(),
            CitevalError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_perfect_predictions() {
        let (g, _) = random_pair(30, 40, 7);
        let max_positives = (0..g.rows()).map(|r| g.count_ones_in_row(r)).max().unwrap();
        let recall = recall_at_m(&g, &g, max_positives).unwrap();
        assert!((recall - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounded_and_monotonic_in_m() {
        let (g, p) = random_pair(25, 60, 11);
        let mut previous = 0.0;
        for m in 1..=70 {
            let recall = recall_at_m(&g, &p, m).unwrap();
            assert!((0.0..=1.0).contains(&recall), "recall {} out of range", recall);
            assert!(recall + 1e-12 >= previous, "recall decreased at m = {}", m);
            previous = recall;
        }
        assert!((previous - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_zero_row_does_not_change_result() {
        let (g, p) = random_pair(10, 20, 3);
        let before = recall_at_m(&g, &p, 5).unwrap();

        let mut g_rows: Vec<Vec<f64>> = g.iter_rows().map(<[f64]>::to_vec).collect();
        let mut p_rows: Vec<Vec<f64>> = p.iter_rows().map(<[f64]>::to_vec).collect();
        g_rows.push(vec![0.0; 20]);
        p_rows.push((0..20).map(|c| c as f64).collect());
        let after = recall_at_m(&matrix(g_rows), &matrix(p_rows), 5).unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (g, p) = random_pair(64, 50, 99);
        let sequential = RecallEvaluator::new(10).unwrap().evaluate(&g, &p).unwrap();
        let parallel = RecallEvaluator::new(10)
            .unwrap()
            .with_parallel(true)
            .evaluate(&g, &p)
            .unwrap();
        assert_eq!(sequential.mean_recall, parallel.mean_recall);
        assert_eq!(sequential.per_row, parallel.per_row);
    }

    #[derive(Default)]
    struct Counting {
        rows: AtomicUsize,
    }

    impl EvalObserver for Counting {
        fn on_row(&self, _result: &RowRecall) {
            self.rows.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_observer_sees_every_row() {
        let (g, p) = random_pair(12, 8, 5);
        let counting = Counting::default();
        RecallEvaluator::new(3)
            .unwrap()
            .with_parallel(true)
            .evaluate_with(&g, &p, &counting)
            .unwrap();
        assert_eq!(counting.rows.load(Ordering::Relaxed), 12);
    }

    struct StopAfter(usize, AtomicUsize);

    impl EvalObserver for StopAfter {
        fn on_row(&self, _result: &RowRecall) {
            self.1.fetch_add(1, Ordering::Relaxed);
        }

        fn is_cancelled(&self) -> bool {
            self.1.load(Ordering::Relaxed) >= self.0
        }
    }

    #[test]
    fn test_cancellation() {
        let (g, p) = random_pair(10, 8, 1);
        let stop = StopAfter(4, AtomicUsize::new(0));
        let err = RecallEvaluator::new(3)
            .unwrap()
            .evaluate_with(&g, &p, &stop)
            .unwrap_err();
        assert!(matches!(err, CitevalError::Cancelled { row: 4 }));
    }

    #[test]
    fn test_report_json() {
        let (g, p) = scenario();
        let report = RecallEvaluator::new(1).unwrap().evaluate(&g, &p).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["m"], 1);
        assert_eq!(value["eligible_rows"], 1);
        assert_eq!(value["mean_recall"], 0.5);
        assert!(value["per_row"][1]["recall"].is_null());
        assert!(value["evaluated_at"].is_string());
    }

    #[test]
    fn test_from_config() {
        let config = EvalConfig {
            m: 7,
            parallel: false,
            progress_every: 0,
        };
        assert_eq!(RecallEvaluator::from_config(&config).unwrap().m(), 7);
    }
}
