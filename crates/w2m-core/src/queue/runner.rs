use anyhow::Result;
use std::collections::VecDeque;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Handle given to every task so it can append newly discovered work.
///
/// Items pushed here are picked up by the runner that dispatched the task;
/// pushing after the run has ended is a no-op.
pub struct Enqueuer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for Enqueuer<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> Enqueuer<T> {
    /// Append `item` to the back of the queue.
    pub fn push(&self, item: T) {
        if self.tx.send(item).is_err() {
            tracing::debug!("queue closed; dropping enqueued item");
        }
    }
}

/// What the runner does when a task returns an error (or panics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop dispatching, abort in-flight tasks and return the first error.
    #[default]
    Abort,
    /// Log the failure, count it, and keep draining the queue.
    Continue,
}

/// Counts for one drained queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Items removed from the queue and started.
    pub dispatched: usize,
    /// Tasks that settled with `Ok`.
    pub succeeded: usize,
    /// Tasks that settled with an error or panicked (only non-zero with `Continue`).
    pub failed: usize,
}

/// Drains `initial` (plus anything tasks append) with at most `max_concurrent`
/// tasks in flight at once.
///
/// `task_fn` is called on the runner's task to build each future, which is then
/// spawned onto a `JoinSet`. Items are dispatched in FIFO order; completion
/// order is whatever the tasks make it. Returns once the queue is empty and no
/// task is running, or on the first failure under [`FailurePolicy::Abort`].
pub async fn run_queue<T, F, Fut>(
    initial: impl IntoIterator<Item = T>,
    mut task_fn: F,
    max_concurrent: usize,
    policy: FailurePolicy,
) -> Result<RunSummary>
where
    T: Send + 'static,
    F: FnMut(T, Enqueuer<T>) -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    if max_concurrent == 0 {
        anyhow::bail!("max_concurrent must be at least 1");
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let enqueuer = Enqueuer { tx };
    let mut queue: VecDeque<T> = initial.into_iter().collect();
    let mut running = JoinSet::new();
    let mut summary = RunSummary::default();

    loop {
        while let Ok(item) = rx.try_recv() {
            queue.push_back(item);
        }

        while running.len() < max_concurrent {
            let Some(item) = queue.pop_front() else {
                break;
            };
            running.spawn(task_fn(item, enqueuer.clone()));
            summary.dispatched += 1;
        }

        // Capacity is >= 1, so an empty running set here means the queue is empty too.
        if running.is_empty() {
            break;
        }

        let Some(joined) = running.join_next().await else {
            break;
        };
        let outcome = match joined {
            Ok(res) => res,
            Err(e) => Err(anyhow::anyhow!("queue task join: {}", e)),
        };

        match outcome {
            Ok(()) => summary.succeeded += 1,
            Err(err) => {
                summary.failed += 1;
                match policy {
                    FailurePolicy::Abort => {
                        running.shutdown().await;
                        return Err(err);
                    }
                    FailurePolicy::Continue => {
                        tracing::warn!(error = %format!("{:#}", err), "queue task failed; continuing");
                    }
                }
            }
        }
    }

    tracing::debug!(
        dispatched = summary.dispatched,
        failed = summary.failed,
        "queue drained"
    );
    Ok(summary)
}
