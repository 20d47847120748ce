//! Session-aware browsing helpers behind `ls` and `resolve`.

use anyhow::Result;

use super::item::{DriveItem, ItemRef};
use super::{ensure_authenticated, path, RemoteDrive};
use crate::error::W2mError;
use crate::session::SessionState;

/// Display lines for the children of `cwd/rel` below the session root.
/// Folders get a trailing `/`.
pub async fn list_entries(
    drive: &dyn RemoteDrive,
    state: &SessionState,
    rel: Option<&str>,
) -> Result<Vec<String>> {
    let root = state.root_ref("ls")?;
    let rel = rel.unwrap_or("");
    if rel.starts_with("https://") {
        return Err(W2mError::ShareLinkPath { command: "ls" }.into());
    }
    let dir = state.resolve_path(rel);
    ensure_authenticated(drive)?;

    let children = drive.list_children(&root, Some(&dir)).await?;
    Ok(children
        .iter()
        .map(|item| {
            let mut line = path::join(&dir, &item.name);
            if item.is_folder() {
                line.push('/');
            }
            line
        })
        .collect())
}

/// Resolve a sharing link and make the item it points at the session root
/// (cwd reset to `/`). Returns the resolved item and its root reference.
pub async fn resolve_root(
    drive: &dyn RemoteDrive,
    state: &mut SessionState,
    link: &str,
) -> Result<(DriveItem, ItemRef)> {
    ensure_authenticated(drive)?;
    let item = drive.resolve_share_link(link).await?;
    let root = item.item_ref()?;
    state.set_root(&root);
    tracing::info!(root = %root.canonical_path(), "root path updated");
    Ok((item, root))
}
