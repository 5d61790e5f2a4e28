//! # Taskfan
//!
//! The embeddable parallel task runner.
//!
//! Register named, independent units of work, run them all concurrently, and
//! collect one result per task no matter what fails. A library, not a
//! service: runs on your tokio runtime, in your process.
//!
//! ## Why Taskfan?
//!
//! - **No lost results** - every registered task produces exactly one
//!   [`TaskResult`], whether it succeeds, fails, or overruns the deadline
//! - **Middleware** - cross-cutting behavior (timing, logging, context
//!   injection) composed around every task without the task knowing
//! - **Cooperative deadlines** - one timeout for the whole run, broadcast to
//!   every task through its [`TaskContext`]; tasks are signalled, never killed
//! - **Fan-out/fan-in** - one tokio task per work item, results funneled back
//!   through a bounded channel in completion order
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use taskfan::{Runner, TaskError};
//!
//! let mut runner = Runner::new();
//! runner.add("fetch_prices", |_ctx| async { Ok(()) });
//! runner.add("fetch_news", |_ctx| async {
//!     Err(TaskError::fail(anyhow::anyhow!("upstream down")))
//! });
//! runner.set_timeout(std::time::Duration::from_secs(5));
//!
//! for result in runner.run().await {
//!     println!("{}: {:?} in {:?}", result.name(), result.error(), result.time());
//! }
//! ```
//!
//! ## Middleware
//!
//! Middleware wrap the work function; the last one registered runs outermost:
//!
//! ```rust,ignore
//! use taskfan::{middleware, TaskFn};
//! use std::sync::Arc;
//!
//! runner.wrap(middleware(|next: TaskFn| {
//!     Arc::new(move |mut ctx| {
//!         ctx.attachments_mut().insert(RequestId(42));
//!         next(ctx)
//!     })
//! }));
//! ```
//!
//! ## Pooling
//!
//! Hot paths that spin up many short-lived runners can recycle them through
//! a [`RunnerPool`] instead of reallocating.

pub mod context;
pub mod middleware;
pub mod pool;
pub mod runner;
pub mod task;

pub use context::{Attachments, TaskContext};
pub use middleware::{middleware, MiddlewareFn};
pub use pool::RunnerPool;
pub use runner::{ResultStream, Runner};
pub use task::{TaskError, TaskFn, TaskFuture, TaskResult, Work};
