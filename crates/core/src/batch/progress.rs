//! Thread-safe progress aggregation for one batch run
//!
//! Counters live behind a single mutex, so every snapshot a callback sees is
//! internally consistent and snapshots arrive strictly in completion order.
//! A panicking callback is contained here - it never takes a worker down.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use cohora_domain::Progress;
use tracing::warn;

/// Callback invoked synchronously after every terminal outcome
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

#[derive(Debug, Default)]
struct Counters {
    completed: usize,
    errors: usize,
}

/// Aggregates terminal outcomes into [`Progress`] snapshots
///
/// One tracker belongs to exactly one batch run; nothing persists across
/// runs. `completed` is monotonically non-decreasing and never exceeds
/// `total`.
pub struct ProgressTracker {
    total: usize,
    started: Instant,
    callback: Option<ProgressCallback>,
    counters: Mutex<Counters>,
}

impl ProgressTracker {
    /// Create a tracker for a batch of `total` descriptors
    pub fn new(total: usize) -> Self {
        Self { total, started: Instant::now(), callback: None, counters: Mutex::default() }
    }

    /// Create a tracker that notifies `callback` after every terminal outcome
    pub fn with_callback(total: usize, callback: ProgressCallback) -> Self {
        Self { total, started: Instant::now(), callback: Some(callback), counters: Mutex::default() }
    }

    /// Record one terminal outcome and return the resulting snapshot.
    ///
    /// The registered callback (if any) runs inside the same critical
    /// section, so callbacks observe snapshots in completion order with no
    /// lost updates. A callback panic is caught and logged, never
    /// propagated to the worker.
    pub fn record(&self, failed: bool) -> Progress {
        let mut counters = self.counters.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        counters.completed += 1;
        if failed {
            counters.errors += 1;
        }
        debug_assert!(counters.completed <= self.total);

        let snapshot = self.make_snapshot(&counters);
        if let Some(callback) = &self.callback {
            let for_callback = snapshot.clone();
            if catch_unwind(AssertUnwindSafe(|| callback(for_callback))).is_err() {
                warn!(completed = snapshot.completed, "progress callback panicked; batch continues");
            }
        }
        snapshot
    }

    /// Current snapshot without recording anything
    pub fn snapshot(&self) -> Progress {
        let counters = self.counters.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.make_snapshot(&counters)
    }

    fn make_snapshot(&self, counters: &Counters) -> Progress {
        let elapsed = self.started.elapsed();
        // Undefined (not zero) until the first completion: the division is
        // never attempted when completed == 0.
        let average_per_thousand_seconds = if counters.completed > 0 {
            Some(elapsed.as_secs_f64() / counters.completed as f64 * 1000.0)
        } else {
            None
        };
        Progress {
            total: self.total,
            completed: counters.completed,
            errors: counters.errors,
            elapsed,
            average_per_thousand_seconds,
        }
    }
}
