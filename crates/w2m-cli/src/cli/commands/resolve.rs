//! `w2m resolve <link>` – set the session root from a sharing link.

use anyhow::Result;
use w2m_core::drive::{self, RemoteDrive};
use w2m_core::session::StateStore;

pub async fn run_resolve(drive: &dyn RemoteDrive, store: &dyn StateStore, link: &str) -> Result<()> {
    let mut state = store.load()?;
    let (item, root) = drive::resolve_root(drive, &mut state, link).await?;
    println!("   Name: {}", item.name);
    println!("     Id: {}", item.id);
    println!("    URL: {}", item.web_url);
    println!("DriveId: {}", root.drive_id);
    store.save(&state)?;
    println!("\nroot path updated: {}", root.canonical_path());
    Ok(())
}
