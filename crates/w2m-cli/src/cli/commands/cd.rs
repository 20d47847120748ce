//! `w2m cd [path]` and `w2m pwd` – remote working directory.

use anyhow::Result;
use w2m_core::session::StateStore;

pub fn run_cd(store: &dyn StateStore, path: Option<&str>) -> Result<()> {
    let mut state = store.load()?;
    state.root_ref("cd")?;
    state.change_dir(path);
    store.save(&state)?;
    println!("{}", state.cwd);
    Ok(())
}

pub fn run_pwd(store: &dyn StateStore) -> Result<()> {
    let state = store.load()?;
    match state.root.as_deref() {
        Some(root) => println!("{} (root {})", state.cwd, root),
        None => println!("{} (no root; use 'w2m resolve <share-link>')", state.cwd),
    }
    Ok(())
}
