//! `w2m ls [path]` – list a remote folder.

use anyhow::Result;
use w2m_core::drive::{self, RemoteDrive};
use w2m_core::session::StateStore;

pub async fn run_ls(drive: &dyn RemoteDrive, store: &dyn StateStore, path: Option<&str>) -> Result<()> {
    let state = store.load()?;
    for line in drive::list_entries(drive, &state, path).await? {
        println!("{line}");
    }
    Ok(())
}
