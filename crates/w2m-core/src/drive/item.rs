//! Graph `driveItem` and related resources (only the fields we read).

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::W2mError;

/// Address of an item: the drive it lives in plus its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub drive_id: String,
    pub item_id: String,
}

impl ItemRef {
    pub fn new(drive_id: impl Into<String>, item_id: impl Into<String>) -> Self {
        Self {
            drive_id: drive_id.into(),
            item_id: item_id.into(),
        }
    }

    /// Canonical path stored as the session root: `/drives/<driveId>/items/<itemId>`.
    pub fn canonical_path(&self) -> String {
        format!("/drives/{}/items/{}", self.drive_id, self.item_id)
    }

    /// Parse a canonical path produced by [`ItemRef::canonical_path`].
    pub fn parse_canonical(path: &str) -> Result<Self> {
        let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
        match parts.as_slice() {
            ["drives", drive_id, "items", item_id] if !drive_id.is_empty() && !item_id.is_empty() => {
                Ok(Self::new(*drive_id, *item_id))
            }
            _ => Err(W2mError::InvalidRootPath(path.to_string()).into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    #[serde(default)]
    pub child_count: u64,
}

/// A file or folder in the remote store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub web_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileFacet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderFacet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_reference: Option<ItemReference>,
}

impl DriveItem {
    pub fn is_file(&self) -> bool {
        self.file.is_some()
    }

    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }

    pub fn drive_id(&self) -> Option<&str> {
        self.parent_reference
            .as_ref()
            .and_then(|p| p.drive_id.as_deref())
    }

    /// Address of this item; needs `parentReference.driveId`.
    pub fn item_ref(&self) -> Result<ItemRef> {
        let drive_id = self
            .drive_id()
            .ok_or_else(|| anyhow::anyhow!("item {:?} has no parent drive id", self.name))?;
        Ok(ItemRef::new(drive_id, &self.id))
    }

    /// Fill in the parent drive id when the listing omitted it.
    pub fn with_default_drive_id(mut self, drive_id: &str) -> Self {
        if self.drive_id().is_none() {
            let parent = self.parent_reference.get_or_insert_with(ItemReference::default);
            parent.drive_id = Some(drive_id.to_string());
        }
        self
    }
}

/// Subset of the Graph `user` resource returned by `/me`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub mail: Option<String>,
    #[serde(default)]
    pub user_principal_name: Option<String>,
}

/// One page of a `children` listing.
#[derive(Debug, Deserialize)]
pub(crate) struct ChildrenPage {
    #[serde(default)]
    pub value: Vec<DriveItem>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}
