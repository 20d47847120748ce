//! `w2m get <path> [local]` – download a file or, with `-r`, a folder tree.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use w2m_core::download::{self, DownloadProgress, GetOutcome, GetRequest};
use w2m_core::drive::RemoteDrive;
use w2m_core::session::StateStore;

pub async fn run_get(
    drive: Arc<dyn RemoteDrive>,
    store: &dyn StateStore,
    cwd: &Path,
    mut req: GetRequest,
) -> Result<()> {
    let state = store.load()?;

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<DownloadProgress>(64);
    let base = cwd.to_path_buf();
    let progress_handle = tokio::spawn(async move {
        while let Some(event) = progress_rx.recv().await {
            println!("{}", event.display_line(&base));
        }
    });
    req.options.progress_tx = Some(progress_tx);

    // The request (and its sender) is consumed by `get`, which closes the channel when done.
    let outcome = download::get(drive, &state, cwd, req).await;
    let _ = progress_handle.await;

    match outcome? {
        GetOutcome::File { path, bytes } => {
            let shown = path.strip_prefix(cwd).unwrap_or(&path);
            println!("saved {} ({} bytes)", shown.display(), bytes);
        }
        GetOutcome::Tree { root, summary } => {
            let shown = root.strip_prefix(cwd).unwrap_or(&root);
            println!(
                "{}: {} file(s) in {} folder(s), {:.2}kb",
                shown.display(),
                summary.files,
                summary.folders,
                summary.bytes as f64 / 1024.0
            );
            if summary.failed > 0 {
                anyhow::bail!("{} item(s) failed to download", summary.failed);
            }
        }
    }
    Ok(())
}
