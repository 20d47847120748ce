//! Remote session state: the resolved root item and the remote working directory.
//!
//! The state is an explicit value threaded through commands; persistence goes
//! through a [`StateStore`] so callers (and tests) choose where it lives.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::drive::{path, ItemRef};
use crate::error::W2mError;

fn root_dir() -> String {
    "/".to_string()
}

/// Persisted as `{"root": "/drives/<d>/items/<id>", "cwd": "/..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(default = "root_dir")]
    pub cwd: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            root: None,
            cwd: root_dir(),
        }
    }
}

impl SessionState {
    /// The root item; `command` names the caller in the error when no root is set.
    pub fn root_ref(&self, command: &'static str) -> Result<ItemRef> {
        let root = self
            .root
            .as_deref()
            .ok_or(W2mError::MissingRoot { command })?;
        ItemRef::parse_canonical(root)
    }

    pub fn set_root(&mut self, root: &ItemRef) {
        self.root = Some(root.canonical_path());
        self.cwd = root_dir();
    }

    /// Absolute remote path of `rel` relative to the working directory.
    pub fn resolve_path(&self, rel: &str) -> String {
        path::join(&self.cwd, rel)
    }

    /// Move the working directory; `None` goes back to `/`.
    pub fn change_dir(&mut self, rel: Option<&str>) {
        self.cwd = match rel {
            Some(rel) => self.resolve_path(rel),
            None => root_dir(),
        };
    }
}

/// Load/save seam for [`SessionState`].
pub trait StateStore {
    fn load(&self) -> Result<SessionState>;
    fn save(&self, state: &SessionState) -> Result<()>;
}

/// JSON file store (`.hlx-blk.json` in the working directory by default).
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    /// A missing or unreadable file yields the empty state.
    fn load(&self) -> Result<SessionState> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SessionState::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("read state file {}", self.path.display()))
            }
        };
        match serde_json::from_str(&data) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!("ignoring invalid state file {}: {}", self.path.display(), e);
                Ok(SessionState::default())
            }
        }
    }

    fn save(&self, state: &SessionState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write state file {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "session state saved");
        Ok(())
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<SessionState>,
}

impl MemoryStateStore {
    pub fn new(state: SessionState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<SessionState> {
        let guard = self
            .state
            .lock()
            .map_err(|_| anyhow::anyhow!("state lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, state: &SessionState) -> Result<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| anyhow::anyhow!("state lock poisoned"))?;
        *guard = state.clone();
        Ok(())
    }
}
