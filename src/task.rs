//! Task vocabulary: work functions, the `Work` trait, and result records.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::context::TaskContext;

/// Boxed future returned by a task's work function.
pub type TaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send>>;

/// A unit of work accepted by the runner.
///
/// Receives the run's [`TaskContext`] so it can cooperatively observe the
/// deadline and read middleware attachments. The same signature is what
/// middleware wrap and produce.
pub type TaskFn = Arc<dyn Fn(TaskContext) -> TaskFuture + Send + Sync>;

/// Error produced by a task execution.
#[derive(Error, Debug)]
pub enum TaskError {
    /// The run's deadline fired and the task chose to stop.
    ///
    /// Only ever returned by a task that observed cancellation on its
    /// context; the runner never synthesizes this on a task's behalf.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The task itself failed. Opaque to the runner, carried verbatim.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl TaskError {
    /// Create a task failure from any error value.
    pub fn fail(err: impl Into<anyhow::Error>) -> Self {
        Self::Failed(err.into())
    }

    /// Returns true if this is the deadline error.
    pub fn is_deadline(&self) -> bool {
        matches!(self, Self::DeadlineExceeded)
    }
}

/// A named unit of work to execute concurrently.
///
/// Heavier tasks can implement this instead of passing a closure to
/// [`Runner::add`](crate::Runner::add); register with
/// [`Runner::add_work`](crate::Runner::add_work).
#[async_trait]
pub trait Work: Send + Sync {
    /// Execute the work with the run's shared context.
    async fn run(&self, ctx: TaskContext) -> Result<(), TaskError>;
}

/// A registered (name, work) pair. Never mutated after creation.
#[derive(Clone)]
pub(crate) struct Task {
    pub(crate) name: String,
    pub(crate) work: TaskFn,
}

/// The immutable record of one task's execution.
///
/// Built exactly once by the unit that ran the task, immediately after its
/// wrapped work function returned, and owned by the caller once received.
#[derive(Debug)]
pub struct TaskResult {
    name: String,
    elapsed: Duration,
    error: Option<TaskError>,
}

impl TaskResult {
    pub(crate) fn new(name: String, elapsed: Duration, error: Option<TaskError>) -> Self {
        Self {
            name,
            elapsed,
            error,
        }
    }

    /// Name the task was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wall-clock duration of the task's execution.
    pub fn time(&self) -> Duration {
        self.elapsed
    }

    /// The task's error, if it failed. `None` on success.
    pub fn error(&self) -> Option<&TaskError> {
        self.error.as_ref()
    }
}
