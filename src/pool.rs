//! A free-list pool of reusable runners.

use std::sync::Mutex;

use crate::runner::Runner;

/// Thread-safe pool of reset-ready [`Runner`]s.
///
/// Avoids reallocating task and middleware lists on hot paths that build and
/// run many short-lived runners. An explicit value to inject rather than a
/// process-wide global: share it behind an `Arc` where needed.
///
/// Lifecycle per runner: [`acquire`](RunnerPool::acquire) → register → run →
/// [`release`](RunnerPool::release).
#[derive(Default)]
pub struct RunnerPool {
    idle: Mutex<Vec<Runner>>,
}

impl RunnerPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a reset-ready runner from the pool, or build a fresh one if the
    /// pool is empty.
    pub fn acquire(&self) -> Runner {
        self.idle.lock().unwrap().pop().unwrap_or_default()
    }

    /// Reset a runner and return it to the pool.
    ///
    /// The runner must not have a run in flight.
    pub fn release(&self, mut runner: Runner) {
        runner.reset();
        self.idle.lock().unwrap().push(runner);
    }

    /// Number of idle runners currently pooled.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap().len()
    }
}
