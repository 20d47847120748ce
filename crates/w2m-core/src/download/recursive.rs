//! Recursive folder download over the bounded queue.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::progress::DownloadProgress;
use super::sidecar::Sidecar;
use crate::drive::{path, DriveItem, RemoteDrive};
use crate::queue::{run_queue, Enqueuer, FailurePolicy};

/// One pending node: everything needed to fetch it without looking elsewhere.
#[derive(Clone)]
pub struct DownloadItem {
    pub drive: Arc<dyn RemoteDrive>,
    /// Local directory the node is materialized in.
    pub dest_dir: PathBuf,
    /// Remote path of `dest_dir` relative to the download root argument.
    pub rel_path: String,
    pub item: DriveItem,
}

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Files and listings in flight at once.
    pub max_concurrent: usize,
    /// Keep going after a failed file or listing instead of aborting the run.
    pub keep_going: bool,
    /// Receives one event per written file.
    pub progress_tx: Option<mpsc::Sender<DownloadProgress>>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            max_concurrent: 8,
            keep_going: false,
            progress_tx: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub files: u64,
    pub folders: u64,
    pub bytes: u64,
    /// Failed files/listings (only non-zero with `keep_going`).
    pub failed: u64,
}

#[derive(Default)]
struct Tally {
    files: AtomicU64,
    folders: AtomicU64,
    bytes: AtomicU64,
}

struct Shared {
    tally: Tally,
    progress_tx: Option<mpsc::Sender<DownloadProgress>>,
}

/// Download `root` (file or folder) into `dest_dir/<root.name>`.
///
/// `rel_root` is the remote path the sidecar `relPath` values are built from.
/// Names are used as-is: two remote siblings with the same name end up in the
/// same local file, last writer wins.
pub async fn download_recursively(
    drive: Arc<dyn RemoteDrive>,
    dest_dir: PathBuf,
    rel_root: &str,
    root: DriveItem,
    opts: DownloadOptions,
) -> Result<DownloadSummary> {
    let shared = Arc::new(Shared {
        tally: Tally::default(),
        progress_tx: opts.progress_tx,
    });
    let policy = if opts.keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    };

    let seed = DownloadItem {
        drive,
        dest_dir,
        rel_path: rel_root.to_string(),
        item: root,
    };
    let task_shared = Arc::clone(&shared);
    let run = run_queue(
        [seed],
        move |work, queue| handle_item(work, queue, Arc::clone(&task_shared)),
        opts.max_concurrent.max(1),
        policy,
    )
    .await?;

    let tally = &shared.tally;
    Ok(DownloadSummary {
        files: tally.files.load(Ordering::Relaxed),
        folders: tally.folders.load(Ordering::Relaxed),
        bytes: tally.bytes.load(Ordering::Relaxed),
        failed: run.failed as u64,
    })
}

async fn handle_item(
    work: DownloadItem,
    queue: Enqueuer<DownloadItem>,
    shared: Arc<Shared>,
) -> Result<()> {
    let DownloadItem {
        drive,
        dest_dir,
        rel_path,
        item,
    } = work;
    let dst = dest_dir.join(&item.name);
    let item_rel = path::rel_join(&rel_path, &item.name);

    if item.is_file() {
        tracing::debug!("saving {} to {}", item.web_url, dst.display());
        let data = drive.download_item(&item).await?;
        tokio::fs::create_dir_all(&dest_dir)
            .await
            .with_context(|| format!("create {}", dest_dir.display()))?;
        tokio::fs::write(&dst, &data)
            .await
            .with_context(|| format!("write {}", dst.display()))?;
        Sidecar::for_item(&item, &item_rel).write_next_to(&dst).await?;

        let bytes = data.len() as u64;
        shared.tally.files.fetch_add(1, Ordering::Relaxed);
        shared.tally.bytes.fetch_add(bytes, Ordering::Relaxed);
        tracing::info!(bytes, path = %dst.display(), "downloaded");
        if let Some(tx) = &shared.progress_tx {
            let _ = tx.send(DownloadProgress { bytes, path: dst }).await;
        }
    } else if item.is_folder() {
        let item_ref = item.item_ref()?;
        let children = drive
            .list_children(&item_ref, None)
            .await
            .with_context(|| format!("list {}", item_rel))?;
        shared.tally.folders.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(folder = %item_rel, children = children.len(), "listed");
        for child in children {
            queue.push(DownloadItem {
                drive: Arc::clone(&drive),
                dest_dir: dst.clone(),
                rel_path: item_rel.clone(),
                item: child.with_default_drive_id(&item_ref.drive_id),
            });
        }
    } else {
        tracing::debug!(name = %item.name, "skipping item that is neither file nor folder");
    }
    Ok(())
}
