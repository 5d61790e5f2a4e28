//! The runner: registration, parallel dispatch, and result fan-in.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::context::TaskContext;
use crate::middleware::{compose, MiddlewareFn};
use crate::task::{Task, TaskError, TaskFn, TaskResult, Work};

/// Parallel executor of named, independent tasks.
///
/// Lifecycle: construct empty, register tasks and middleware, optionally set
/// a timeout, then run. One run consumes the registered set logically (the
/// runner can be re-run as-is, or [`reset`](Runner::reset) for pooling).
/// Registration calls must not race a run in flight; setup-then-run ordering
/// is the caller's responsibility.
///
/// Every registered task gets its own tokio task; there is no concurrency
/// cap. Callers needing bounded parallelism batch their own calls.
#[derive(Default)]
pub struct Runner {
    timeout: Option<Duration>,
    tasks: Vec<Task>,
    middleware: Vec<MiddlewareFn>,
}

impl Runner {
    /// Create a new empty runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task under `name`.
    ///
    /// Names are labels only; duplicates are allowed. The closure receives
    /// the run's [`TaskContext`] and should observe it cooperatively if it
    /// wants to honor the deadline.
    pub fn add<F, Fut>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        let work: TaskFn = Arc::new(move |ctx| Box::pin(f(ctx)));
        self.tasks.push(Task {
            name: name.into(),
            work,
        });
    }

    /// Register a [`Work`] implementation under `name`.
    pub fn add_work(&mut self, name: impl Into<String>, work: impl Work + 'static) {
        let work = Arc::new(work);
        let work: TaskFn = Arc::new(move |ctx| {
            let work = work.clone();
            Box::pin(async move { work.run(ctx).await })
        });
        self.tasks.push(Task {
            name: name.into(),
            work,
        });
    }

    /// Append a middleware to the chain.
    ///
    /// Call order is preserved: the last middleware registered ends up
    /// outermost around every task, the first sits closest to the task's own
    /// function. See [`crate::middleware`].
    pub fn wrap(&mut self, mw: MiddlewareFn) {
        self.middleware.push(mw);
    }

    /// Append several middleware at once, in iteration order.
    pub fn wrap_all<I>(&mut self, middleware: I)
    where
        I: IntoIterator<Item = MiddlewareFn>,
    {
        self.middleware.extend(middleware);
    }

    /// Set the deadline applied uniformly to all tasks in the next run.
    ///
    /// `Duration::ZERO` clears it (unlimited). When the deadline fires the
    /// run's cancellation token is triggered; each task is responsible for
    /// observing it. The runner never forcibly stops a task.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = if timeout.is_zero() {
            None
        } else {
            Some(timeout)
        };
    }

    /// Clear tasks, middleware, and timeout, returning the runner to a state
    /// indistinguishable from freshly constructed.
    ///
    /// Must not be called while a run is in flight.
    pub fn reset(&mut self) {
        self.timeout = None;
        self.tasks.clear();
        self.middleware.clear();
    }

    /// Run all tasks and block until every result has been collected.
    ///
    /// Always returns exactly one [`TaskResult`] per registered task, in
    /// arrival order (completion timing, not registration order). Task
    /// failures are carried as data on the results; nothing a task does can
    /// abort its siblings or the run.
    pub async fn run(&self) -> Vec<TaskResult> {
        let mut rx = self.dispatch();
        let mut results = Vec::with_capacity(self.tasks.len());

        while let Some(result) = rx.recv().await {
            results.push(result);
        }

        results
    }

    /// Run all tasks and return immediately with a live result stream.
    ///
    /// Equivalent to [`run`](Runner::run) in result content; the stream
    /// yields each [`TaskResult`] as its task finishes and ends after the
    /// last one. Must be called from within a tokio runtime.
    pub fn run_async(&self) -> ResultStream {
        ResultStream {
            rx: self.dispatch(),
        }
    }

    /// Launch one execution unit per task and return the fan-in receiver.
    fn dispatch(&self) -> mpsc::Receiver<TaskResult> {
        // Capacity equals task count so producers never block on a slow
        // consumer. mpsc panics on zero capacity, hence the floor.
        let (tx, rx) = mpsc::channel(self.tasks.len().max(1));
        let cancel = CancellationToken::new();

        let timer = self.timeout.map(|timeout| {
            let token = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                token.cancel();
            })
        });

        debug!(
            tasks = self.tasks.len(),
            timeout = ?self.timeout,
            "dispatching run"
        );

        let mut units = Vec::with_capacity(self.tasks.len());
        for task in &self.tasks {
            let work = compose(&self.middleware, task.work.clone());
            let ctx = TaskContext::new(cancel.clone());
            let name = task.name.clone();
            let tx = tx.clone();

            units.push(tokio::spawn(async move {
                let start = Instant::now();
                let error = work(ctx).await.err();
                let result = TaskResult::new(name, start.elapsed(), error);
                let _ = tx.send(result).await;
            }));
        }

        // The receiver observes end-of-stream once every unit has sent its
        // result and dropped its sender clone.
        drop(tx);

        // Release the deadline timer once all units have finished, whether
        // or not it fired.
        if let Some(timer) = timer {
            tokio::spawn(async move {
                for unit in units {
                    let _ = unit.await;
                }
                timer.abort();
            });
        }

        rx
    }
}

/// Live handle to an in-flight run's results.
///
/// Yields one [`TaskResult`] per registered task as each finishes, then ends.
/// Drain it fully to observe every outcome; dropping it early simply discards
/// results that are still arriving, the tasks themselves run to completion.
pub struct ResultStream {
    rx: mpsc::Receiver<TaskResult>,
}

impl ResultStream {
    /// Receive the next result, or `None` once all tasks have reported.
    pub async fn recv(&mut self) -> Option<TaskResult> {
        self.rx.recv().await
    }

    /// Collect all remaining results, blocking until the run completes.
    pub async fn collect(mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();
        while let Some(result) = self.rx.recv().await {
            results.push(result);
        }
        results
    }
}

impl Stream for ResultStream {
    type Item = TaskResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
