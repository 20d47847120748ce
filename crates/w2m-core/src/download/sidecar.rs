//! `<file>.json` provenance record written next to every downloaded file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::drive::DriveItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidecar {
    /// Web URL of the remote item.
    pub url: String,
    /// Drive the item lives in.
    pub drive_id: Option<String>,
    /// Remote item id.
    #[serde(rename = "it")]
    pub item_id: String,
    /// Path relative to the download root argument.
    pub rel_path: String,
}

impl Sidecar {
    pub fn for_item(item: &DriveItem, rel_path: &str) -> Self {
        Self {
            url: item.web_url.clone(),
            drive_id: item.drive_id().map(str::to_string),
            item_id: item.id.clone(),
            rel_path: rel_path.to_string(),
        }
    }

    /// Sidecar path for a downloaded file: `file.docx` -> `file.docx.json`.
    pub fn path_for(file: &Path) -> PathBuf {
        let mut o = file.as_os_str().to_owned();
        o.push(".json");
        PathBuf::from(o)
    }

    pub async fn write_next_to(&self, file: &Path) -> Result<PathBuf> {
        let path = Self::path_for(file);
        let json = serde_json::to_vec(self)?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("write sidecar {}", path.display()))?;
        Ok(path)
    }
}
