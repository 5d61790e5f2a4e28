//! Tests for the runner free-list pool.

use std::sync::Arc;
use std::time::Duration;

use taskfan::{middleware, Runner, RunnerPool};

#[tokio::test]
async fn test_acquire_from_empty_pool_builds_fresh_runner() {
    let pool = RunnerPool::new();
    assert_eq!(pool.idle_count(), 0);

    let runner = pool.acquire();
    assert!(runner.run().await.is_empty());
}

#[tokio::test]
async fn test_release_resets_before_pooling() {
    let pool = RunnerPool::new();

    let mut runner = pool.acquire();
    for i in 0..5 {
        runner.add(format!("task_{i}"), |_ctx| async { Ok(()) });
    }
    runner.wrap(middleware(|next| next));
    runner.wrap(middleware(|next| next));
    runner.set_timeout(Duration::from_secs(1));

    pool.release(runner);
    assert_eq!(pool.idle_count(), 1);

    // The recycled instance must be indistinguishable from fresh.
    let recycled = pool.acquire();
    assert_eq!(pool.idle_count(), 0);
    assert!(recycled.run().await.is_empty());
}

#[tokio::test]
async fn test_recycled_runner_executes_new_tasks() {
    let pool = RunnerPool::new();

    let mut runner = pool.acquire();
    runner.add("old", |_ctx| async { Ok(()) });
    runner.run().await;
    pool.release(runner);

    let mut runner = pool.acquire();
    runner.add("new_a", |_ctx| async { Ok(()) });
    runner.add("new_b", |_ctx| async { Ok(()) });

    let results = runner.run().await;
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.name().starts_with("new_")));
}

#[tokio::test]
async fn test_pool_is_shareable_across_tasks() {
    let pool = Arc::new(RunnerPool::new());

    let mut handles = Vec::new();
    for i in 0..4 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            let mut runner = pool.acquire();
            runner.add(format!("job_{i}"), |_ctx| async { Ok(()) });
            let results = runner.run().await;
            pool.release(runner);
            results.len()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), 1);
    }
    assert_eq!(pool.idle_count(), 4);
}
