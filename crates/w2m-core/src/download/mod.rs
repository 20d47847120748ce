//! Remote-to-local downloads.
//!
//! [`download_recursively`] walks a remote folder tree through the bounded
//! queue: folders are listed and their children enqueued, files are written
//! under the destination together with a `<name>.json` sidecar recording where
//! they came from. [`get`] is the whole `get` command: destination checks, then
//! either a single-file fetch or a recursive download.

mod fetch;
mod progress;
mod recursive;
mod sidecar;
mod target;

pub use fetch::{get, GetOutcome, GetRequest};
pub use progress::DownloadProgress;
pub use recursive::{download_recursively, DownloadItem, DownloadOptions, DownloadSummary};
pub use sidecar::Sidecar;
pub use target::plan_destination;
