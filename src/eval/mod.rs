//! Evaluation framework: stable top-M ranking, Recall@M, and progress hooks.

pub mod metrics;
pub mod observer;
pub mod ranking;

pub use metrics::{recall_at_m, row_recall, RecallEvaluator, RecallReport, RowRecall};
pub use observer::{EvalObserver, LogProgress, NoopObserver};
pub use ranking::rank_top_m;
