//! `w2m me` – who is signed in.

use anyhow::Result;
use w2m_core::drive::{ensure_authenticated, RemoteDrive};

pub async fn run_me(drive: &dyn RemoteDrive) -> Result<()> {
    ensure_authenticated(drive)?;
    let me = drive.me().await?;
    let mail = me
        .mail
        .as_deref()
        .or(me.user_principal_name.as_deref())
        .unwrap_or("-");
    println!("Logged in as: {} ({})", me.display_name, mail);
    Ok(())
}
