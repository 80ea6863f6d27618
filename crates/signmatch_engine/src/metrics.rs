// Metrics hooks for the engine crate.
//
// Callers install a global `MatchMetrics` implementation via
// [`set_match_metrics`]; matching passes and relation searches then report
// per-call latency and sizes. This keeps instrumentation decoupled from any
// specific metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Metrics observer for engine operations.
pub trait MatchMetrics: Send + Sync {
    /// Record one matching pass.
    ///
    /// `subject` is the subject map's tag as supplied by the caller,
    /// `latency` the wall-clock duration of the pass, and `placements` the
    /// number of result-grid cells produced.
    fn record_match(&self, subject: &str, latency: Duration, placements: usize);

    /// Record one `find_relation` call.
    ///
    /// `word_count` is the number of words queried and `matched` how many
    /// were reconstructed.
    fn record_relation(&self, latency: Duration, word_count: usize, matched: usize);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn MatchMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn MatchMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn MatchMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global engine metrics recorder.
///
/// Typically called once during startup so every matching pass and relation
/// search shares the same backend.
pub fn set_match_metrics(recorder: Option<Arc<dyn MatchMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
