//! Middleware: composable wrappers around a task's work function.

use std::sync::Arc;

use crate::task::TaskFn;

/// A transformation from one work function to another.
///
/// Registered middleware wrap every task in a run, so an implementation must
/// tolerate its composed chain being invoked from multiple execution units
/// concurrently. Middleware typically attach context values before calling
/// the wrapped function, or inspect the error it returns.
pub type MiddlewareFn = Arc<dyn Fn(TaskFn) -> TaskFn + Send + Sync>;

/// Box a plain closure into a [`MiddlewareFn`].
pub fn middleware<F>(f: F) -> MiddlewareFn
where
    F: Fn(TaskFn) -> TaskFn + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Fold the middleware list around a raw work function.
///
/// Composing `[m0, m1, m2]` yields `m2(m1(m0(task)))`: the last-registered
/// middleware is outermost, so its pre-logic runs first and its post-logic
/// last, with the earliest-registered middleware sitting closest to the task
/// itself.
pub(crate) fn compose(middleware: &[MiddlewareFn], task: TaskFn) -> TaskFn {
    middleware.iter().fold(task, |inner, mw| mw(inner))
}
