//! Local destination planning for `get`.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::drive::path;
use crate::error::W2mError;

/// Decide where `remote_path` is saved locally. Touches nothing on disk.
///
/// - no `local`: `cwd/<basename>`
/// - `local` is an existing directory: `local/<basename>`
/// - otherwise `local` names the file itself (`cwd/local`), which is only
///   allowed for non-recursive downloads
///
/// An existing destination is never overwritten.
pub fn plan_destination(
    cwd: &Path,
    remote_path: &str,
    local: Option<&Path>,
    recursive: bool,
) -> Result<PathBuf> {
    let name = path::basename(remote_path);
    let dst = match local {
        None => cwd.join(name),
        Some(local) => {
            let local_abs = cwd.join(local);
            if local_abs.is_dir() {
                local_abs.join(name)
            } else if recursive {
                return Err(W2mError::RecursiveTargetNotDir(local_abs).into());
            } else {
                local_abs
            }
        }
    };

    if dst.exists() {
        return Err(W2mError::RefuseOverwrite(dst).into());
    }
    Ok(dst)
}
