//! Bounded-concurrency work queue.
//!
//! Keeps up to `max_concurrent` tasks in flight; when one settles, the next
//! queued item is started until the queue is empty and nothing is running.
//! Tasks may discover more work while they run and hand it back through an
//! [`Enqueuer`]; appended items join the back of the FIFO before the next
//! dispatch decision.

mod runner;

pub use runner::{run_queue, Enqueuer, FailurePolicy, RunSummary};

#[cfg(test)]
mod tests;
