//! Execution context: cancellation signal plus typed task-scoped attachments.
//!
//! The two concerns are deliberately separate fields: the deadline is a
//! broadcast [`CancellationToken`] shared by every unit in a run, while
//! [`Attachments`] is a per-task typed map middleware can use to pass values
//! down to the work function.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::task::TaskError;

/// Typed task-scoped value map.
///
/// Keys are types: inserting a second value of the same type replaces the
/// first. Values are `Arc`-shared, so cloning the map (and the context that
/// carries it) is cheap.
#[derive(Default, Clone)]
pub struct Attachments {
    map: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Attachments {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, keyed by its type. Replaces any previous value of
    /// the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.map.insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Look up a value by type.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Returns true if a value of type `T` is present.
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    /// Number of attached values.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Context handed to every execution unit in a run.
///
/// Cancellation is cooperative: the runner fires the token when the
/// configured timeout elapses, but never aborts a unit. A well-behaved task
/// polls [`check`](TaskContext::check) (or awaits
/// [`cancelled`](TaskContext::cancelled)) and returns
/// [`TaskError::DeadlineExceeded`] when the signal fires.
#[derive(Clone)]
pub struct TaskContext {
    cancel: CancellationToken,
    attachments: Attachments,
}

impl TaskContext {
    pub(crate) fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            attachments: Attachments::new(),
        }
    }

    /// Returns true once the run's deadline has fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves when the run's deadline fires. Pends forever on a run with
    /// no timeout, so always race it against real work.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }

    /// Cooperative deadline check: `Err(TaskError::DeadlineExceeded)` once
    /// the deadline has fired, `Ok(())` otherwise.
    pub fn check(&self) -> Result<(), TaskError> {
        if self.cancel.is_cancelled() {
            Err(TaskError::DeadlineExceeded)
        } else {
            Ok(())
        }
    }

    /// Values attached by middleware upstream of the current call.
    pub fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    /// Mutable access for middleware that attach values before calling the
    /// wrapped function.
    pub fn attachments_mut(&mut self) -> &mut Attachments {
        &mut self.attachments
    }
}
