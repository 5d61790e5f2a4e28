//! Tests for the non-blocking run handle.

use std::collections::HashSet;
use std::time::Duration;

use taskfan::{Runner, TaskError};
use tokio_stream::StreamExt;

fn mixed_runner() -> Runner {
    let mut runner = Runner::new();
    runner.add("ok_one", |_ctx| async { Ok(()) });
    runner.add("ok_two", |_ctx| async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(())
    });
    runner.add("bad", |_ctx| async {
        Err(TaskError::fail(anyhow::anyhow!("nope")))
    });
    runner
}

fn outcome_set(results: &[taskfan::TaskResult]) -> HashSet<(String, bool)> {
    results
        .iter()
        .map(|r| (r.name().to_string(), r.error().is_some()))
        .collect()
}

#[tokio::test]
async fn test_run_async_matches_run_content() {
    let runner = mixed_runner();

    let blocking = runner.run().await;

    let mut stream = runner.run_async();
    let mut streamed = Vec::new();
    while let Some(result) = stream.recv().await {
        streamed.push(result);
    }

    assert_eq!(blocking.len(), 3);
    assert_eq!(streamed.len(), 3);
    assert_eq!(outcome_set(&blocking), outcome_set(&streamed));
}

#[tokio::test]
async fn test_run_async_returns_before_tasks_finish() {
    let mut runner = Runner::new();
    runner.add("slow", |_ctx| async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(())
    });

    let start = std::time::Instant::now();
    let stream = runner.run_async();
    assert!(start.elapsed() < Duration::from_millis(20));

    let results = stream.collect().await;
    assert_eq!(results.len(), 1);
    assert!(start.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn test_result_stream_implements_stream() {
    let runner = mixed_runner();

    let mut stream = runner.run_async();
    let mut results = Vec::new();
    while let Some(result) = stream.next().await {
        results.push(result);
    }
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_stream_ends_after_last_result() {
    let mut runner = Runner::new();
    runner.add("only", |_ctx| async { Ok(()) });

    let mut stream = runner.run_async();
    assert!(stream.recv().await.is_some());
    assert!(stream.recv().await.is_none());
    assert!(stream.recv().await.is_none());
}

#[tokio::test]
async fn test_empty_runner_stream_ends_immediately() {
    let runner = Runner::new();
    let mut stream = runner.run_async();
    assert!(stream.recv().await.is_none());
}
