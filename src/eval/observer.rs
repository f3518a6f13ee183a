use super::metrics::RowRecall;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Hook into the per-row evaluation loop.
///
/// Rows may be evaluated on worker threads, so implementations must be `Sync`
/// and must not assume rows arrive in order.
pub trait EvalObserver: Sync {
    /// Called after each row has been scored.
    fn on_row(&self, _result: &RowRecall) {}

    /// Checked before each row; returning true aborts the evaluation.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Observer that does nothing.
pub struct NoopObserver;

impl EvalObserver for NoopObserver {}

/// Logs `[done/total]` every `every` rows and honours an optional cancel flag.
pub struct LogProgress {
    total: usize,
    every: usize,
    done: AtomicUsize,
    cancel: Option<Arc<AtomicBool>>,
}

impl LogProgress {
    /// `every == 0` disables the progress lines.
    pub fn new(total: usize, every: usize) -> Self {
        Self {
            total,
            every,
            done: AtomicUsize::new(0),
            cancel: None,
        }
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Rows observed so far.
    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}

impl EvalObserver for LogProgress {
    fn on_row(&self, _result: &RowRecall) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if self.every > 0 && (done % self.every == 0 || done == self.total) {
            log::info!("[{}/{}] rows evaluated", done, self.total);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}
