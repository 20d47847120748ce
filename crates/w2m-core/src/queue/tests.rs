//! Tests for the bounded queue runner.

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Tracks how many tasks are running and the highest value ever seen.
#[derive(Default)]
struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
    total: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

async fn run_flat(n: usize, k: usize) -> (RunSummary, Arc<Gauge>) {
    let gauge = Arc::new(Gauge::default());
    let g = Arc::clone(&gauge);
    let summary = run_queue(
        0..n,
        move |i, _queue: Enqueuer<usize>| {
            let g = Arc::clone(&g);
            async move {
                g.enter();
                tokio::time::sleep(Duration::from_millis(1 + (i % 3) as u64)).await;
                g.leave();
                Ok(())
            }
        },
        k,
        FailurePolicy::Abort,
    )
    .await
    .unwrap();
    (summary, gauge)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn never_exceeds_limit_and_runs_every_item() {
    for k in [1usize, 2, 3, 8] {
        for n in [0usize, 1, 5, 20] {
            let (summary, gauge) = run_flat(n, k).await;
            assert_eq!(summary.dispatched, n, "n={n} k={k}");
            assert_eq!(summary.succeeded, n);
            assert_eq!(gauge.total.load(Ordering::SeqCst), n);
            assert!(gauge.peak.load(Ordering::SeqCst) <= k, "peak over limit k={k}");
        }
    }
}

#[tokio::test]
async fn empty_queue_completes_immediately() {
    let summary = run_queue(
        Vec::<u32>::new(),
        |_, _| async { Ok(()) },
        4,
        FailurePolicy::Abort,
    )
    .await
    .unwrap();
    assert_eq!(summary, RunSummary::default());
}

#[tokio::test]
async fn zero_concurrency_is_rejected() {
    let err = run_queue(vec![1u32], |_, _| async { Ok(()) }, 0, FailurePolicy::Abort)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("at least 1"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn appended_items_are_all_dispatched() {
    // Each item `d` below depth 3 appends three children: 1 + 3 + 9 + 27 items.
    let seen = Arc::new(AtomicUsize::new(0));
    let s = Arc::clone(&seen);
    let summary = run_queue(
        vec![0u32],
        move |depth, queue| {
            let s = Arc::clone(&s);
            async move {
                s.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
                if depth < 3 {
                    for _ in 0..3 {
                        queue.push(depth + 1);
                    }
                }
                Ok(())
            }
        },
        2,
        FailurePolicy::Abort,
    )
    .await
    .unwrap();
    assert_eq!(summary.dispatched, 40);
    assert_eq!(seen.load(Ordering::SeqCst), 40);
}

#[tokio::test]
async fn dispatch_is_fifo_with_single_slot() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let o = Arc::clone(&order);
    run_queue(
        vec!["a", "b"],
        move |name, queue| {
            let o = Arc::clone(&o);
            async move {
                o.lock().unwrap().push(name);
                if name == "a" {
                    queue.push("a1");
                    queue.push("a2");
                }
                Ok(())
            }
        },
        1,
        FailurePolicy::Abort,
    )
    .await
    .unwrap();
    assert_eq!(*order.lock().unwrap(), vec!["a", "b", "a1", "a2"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn abort_policy_returns_first_error() {
    let started = Arc::new(AtomicUsize::new(0));
    let s = Arc::clone(&started);
    let err = run_queue(
        0..10u32,
        move |i, _| {
            let s = Arc::clone(&s);
            async move {
                s.fetch_add(1, Ordering::SeqCst);
                if i == 3 {
                    anyhow::bail!("item {i} failed");
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok(())
            }
        },
        2,
        FailurePolicy::Abort,
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "item 3 failed");
    assert!(started.load(Ordering::SeqCst) < 10);
}

#[tokio::test]
async fn continue_policy_counts_failures_and_panics() {
    let summary = run_queue(
        0..6u32,
        |i, _| async move {
            match i {
                1 => anyhow::bail!("boom"),
                4 => panic!("task panicked"),
                _ => Ok(()),
            }
        },
        3,
        FailurePolicy::Continue,
    )
    .await
    .unwrap();
    assert_eq!(summary.dispatched, 6);
    assert_eq!(summary.succeeded, 4);
    assert_eq!(summary.failed, 2);
}
