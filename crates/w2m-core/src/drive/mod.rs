//! Remote document store access.
//!
//! [`RemoteDrive`] is the contract the rest of the crate consumes; [`GraphDrive`]
//! implements it against the Microsoft Graph API (OneDrive / SharePoint).
//! Authentication is not handled here: the client is handed an access token
//! obtained elsewhere and only reports whether it holds a usable one.

mod browse;
mod graph;
mod item;
pub mod path;
mod share;
mod token;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::W2mError;

pub use browse::{list_entries, resolve_root};
pub use graph::GraphDrive;
pub use item::{DriveItem, FileFacet, FolderFacet, ItemRef, ItemReference, UserProfile};
pub use share::encode_share_link;
pub use token::AccessToken;

#[async_trait]
pub trait RemoteDrive: Send + Sync {
    /// True if the client holds a token it believes is still valid.
    fn authenticated(&self) -> bool;

    /// Profile of the signed-in user.
    async fn me(&self) -> Result<UserProfile>;

    /// Resolve a sharing URL to the item it points at.
    async fn resolve_share_link(&self, link: &str) -> Result<DriveItem>;

    /// Children of `item`, or of the item at `path` below it.
    async fn list_children(&self, item: &ItemRef, path: Option<&str>) -> Result<Vec<DriveItem>>;

    /// Content of a file item.
    async fn download_item(&self, item: &DriveItem) -> Result<Vec<u8>>;

    /// Full metadata of the item at `path` below `item` (empty path = `item` itself).
    async fn get_item(&self, item: &ItemRef, path: &str) -> Result<DriveItem>;

    /// Content of the file at `path` below `item`.
    async fn get_item_content(&self, item: &ItemRef, path: &str) -> Result<Vec<u8>>;
}

/// Fails with [`W2mError::NotAuthenticated`] unless `drive` holds a usable token.
pub fn ensure_authenticated(drive: &dyn RemoteDrive) -> Result<()> {
    if !drive.authenticated() {
        return Err(W2mError::NotAuthenticated.into());
    }
    Ok(())
}
