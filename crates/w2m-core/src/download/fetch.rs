//! The `get` command: single file or whole tree, relative to the session cwd.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::recursive::{download_recursively, DownloadOptions, DownloadSummary};
use super::target::plan_destination;
use crate::drive::{ensure_authenticated, path, RemoteDrive};
use crate::session::SessionState;

#[derive(Debug, Clone)]
pub struct GetRequest {
    /// Remote path as typed, relative to the session cwd.
    pub remote_path: String,
    /// Local directory or file name.
    pub local: Option<PathBuf>,
    pub recursive: bool,
    pub options: DownloadOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetOutcome {
    File { path: PathBuf, bytes: u64 },
    Tree { root: PathBuf, summary: DownloadSummary },
}

/// Run `get`. Every precondition (root set, destination free, recursive target
/// is a directory, client authenticated) is checked before anything is fetched
/// or written.
///
/// For `-r`, sidecar `relPath` values start at the remote argument itself:
/// `get -r Archive/2024` records `Archive/2024/q1.docx`; the folder name is
/// not repeated after the argument (never `Archive/2024/2024/q1.docx`).
pub async fn get(
    drive: Arc<dyn RemoteDrive>,
    state: &SessionState,
    cwd: &Path,
    req: GetRequest,
) -> Result<GetOutcome> {
    let root = state.root_ref("get")?;
    let remote = state.resolve_path(&req.remote_path);
    let dst = plan_destination(cwd, &remote, req.local.as_deref(), req.recursive)?;
    ensure_authenticated(drive.as_ref())?;

    if req.recursive {
        let item = drive
            .get_item(&root, &remote)
            .await
            .with_context(|| format!("look up {}", remote))?;
        let dest_dir = dst
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf());
        // The root item's own name is appended by the walk, so relPath starts from its parent.
        let rel_root = path::parent(&req.remote_path).to_string();
        tracing::info!(remote = %remote, dest = %dst.display(), "recursive download");
        let summary = download_recursively(drive, dest_dir, &rel_root, item, req.options).await?;
        Ok(GetOutcome::Tree { root: dst, summary })
    } else {
        tracing::info!(remote = %remote, dest = %dst.display(), "saving");
        let data = drive.get_item_content(&root, &remote).await?;
        tokio::fs::write(&dst, &data)
            .await
            .with_context(|| format!("write {}", dst.display()))?;
        Ok(GetOutcome::File {
            path: dst,
            bytes: data.len() as u64,
        })
    }
}
