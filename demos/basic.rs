//! Basic usage example for the taskfan runner.
//!
//! This example demonstrates:
//! - Registering closure and trait-based tasks
//! - Wrapping every task with middleware (context injection + timing)
//! - Setting a run-wide cooperative deadline
//! - Collecting results via the blocking and streaming entry points
//! - Recycling runners through a pool

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use taskfan::{
    middleware, Runner, RunnerPool, TaskContext, TaskError, TaskFn, Work,
};

/// Value a middleware attaches for every task in the run.
#[derive(Debug, Clone)]
struct RunLabel(&'static str);

/// A trait-based task: checks the deadline between chunks of work.
struct ChunkedWork {
    chunks: u32,
}

#[async_trait]
impl Work for ChunkedWork {
    async fn run(&self, ctx: TaskContext) -> Result<(), TaskError> {
        for chunk in 0..self.chunks {
            ctx.check()?;
            println!("[chunked] processing chunk {chunk}");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskfan=debug".into()),
        )
        .init();

    println!("=== taskfan - Basic Example ===\n");

    let pool = RunnerPool::new();
    let mut runner = pool.acquire();

    // Middleware 1: attach a label every task can read.
    runner.wrap(middleware(|next: TaskFn| {
        Arc::new(move |mut ctx: TaskContext| {
            ctx.attachments_mut().insert(RunLabel("demo-run"));
            next(ctx)
        })
    }));

    // Middleware 2 (outermost, registered last): report each task's outcome.
    runner.wrap(middleware(|next: TaskFn| {
        Arc::new(move |ctx: TaskContext| -> taskfan::TaskFuture {
            let fut = next(ctx);
            Box::pin(async move {
                let outcome = fut.await;
                match &outcome {
                    Ok(()) => println!("[middleware] task succeeded"),
                    Err(e) => println!("[middleware] task failed: {e}"),
                }
                outcome
            })
        })
    }));

    // A task that reads what middleware attached.
    runner.add("labelled", |ctx| async move {
        let label = ctx
            .attachments()
            .get::<RunLabel>()
            .map(|l| l.0)
            .unwrap_or("<missing>");
        println!("[labelled] running under label {label:?}");
        Ok(())
    });

    // A task that fails; siblings are unaffected.
    runner.add("flaky", |_ctx| async {
        Err(TaskError::fail(anyhow::anyhow!("upstream unavailable")))
    });

    // A cooperative task registered through the Work trait.
    runner.add_work("chunked", ChunkedWork { chunks: 3 });

    runner.set_timeout(Duration::from_secs(1));

    println!("--- Blocking collection (arrival order) ---");
    for result in runner.run().await {
        println!(
            "{:>10}: error={:?} elapsed={:?}",
            result.name(),
            result.error().map(|e| e.to_string()),
            result.time()
        );
    }

    println!("\n--- Streaming collection ---");
    let mut stream = runner.run_async();
    while let Some(result) = stream.recv().await {
        println!("{:>10}: arrived after {:?}", result.name(), result.time());
    }

    pool.release(runner);
    println!("\nrunner recycled, pool idle: {}", pool.idle_count());
}
