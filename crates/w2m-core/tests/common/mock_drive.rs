//! In-memory [`RemoteDrive`] for integration tests.
//!
//! Holds a tree of folders and files under a single root folder. Individual
//! nodes can be marked as failing, and every listing/download records how many
//! calls were in flight at once.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use w2m_core::drive::{
    DriveItem, FileFacet, FolderFacet, ItemRef, ItemReference, RemoteDrive, UserProfile,
};

pub const DRIVE_ID: &str = "drv-1";
pub const ROOT_ID: &str = "root";
pub const SHARE_LINK: &str = "https://1drv.ms/f/s!mock-share";

struct Node {
    item: DriveItem,
    children: Vec<String>,
    content: Vec<u8>,
    fail: bool,
}

pub struct MockDrive {
    nodes: HashMap<String, Node>,
    next_id: usize,
    authenticated: bool,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl MockDrive {
    /// Empty drive with a root folder named `name`.
    pub fn new(name: &str) -> Self {
        let root = DriveItem {
            id: ROOT_ID.to_string(),
            name: name.to_string(),
            web_url: format!("https://onedrive.test/{}", name),
            folder: Some(FolderFacet::default()),
            parent_reference: Some(ItemReference {
                drive_id: Some(DRIVE_ID.to_string()),
                path: None,
            }),
            ..DriveItem::default()
        };
        let mut nodes = HashMap::new();
        nodes.insert(
            ROOT_ID.to_string(),
            Node {
                item: root,
                children: Vec::new(),
                content: Vec::new(),
                fail: false,
            },
        );
        Self {
            nodes,
            next_id: 0,
            authenticated: true,
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn root_ref() -> ItemRef {
        ItemRef::new(DRIVE_ID, ROOT_ID)
    }

    pub fn signed_out(mut self) -> Self {
        self.authenticated = false;
        self
    }

    /// Every listing and download sleeps this long.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn add(&mut self, parent: &str, mut item: DriveItem, content: Vec<u8>) -> String {
        self.next_id += 1;
        let id = format!("item-{}", self.next_id);
        item.id = id.clone();
        item.web_url = format!("https://onedrive.test/{}", id);
        self.nodes.insert(
            id.clone(),
            Node {
                item,
                children: Vec::new(),
                content,
                fail: false,
            },
        );
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(id.clone());
        }
        id
    }

    pub fn add_folder(&mut self, parent: &str, name: &str) -> String {
        let item = DriveItem {
            name: name.to_string(),
            folder: Some(FolderFacet::default()),
            ..DriveItem::default()
        };
        self.add(parent, item, Vec::new())
    }

    pub fn add_file(&mut self, parent: &str, name: &str, content: &[u8]) -> String {
        let item = DriveItem {
            name: name.to_string(),
            size: Some(content.len() as u64),
            file: Some(FileFacet::default()),
            ..DriveItem::default()
        };
        self.add(parent, item, content.to_vec())
    }

    /// An item that is neither a file nor a folder (e.g. a OneNote package).
    pub fn add_other(&mut self, parent: &str, name: &str) -> String {
        let item = DriveItem {
            name: name.to_string(),
            ..DriveItem::default()
        };
        self.add(parent, item, Vec::new())
    }

    /// Downloads or listings of `id` fail from now on.
    pub fn fail(&mut self, id: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.fail = true;
        }
    }

    /// `depth` levels of `branching` folders, each holding `branching` files.
    /// Returns the number of files created.
    pub fn add_tree(&mut self, parent: &str, depth: usize, branching: usize) -> usize {
        let mut files = 0;
        for f in 0..branching {
            self.add_file(parent, &format!("doc-{}.docx", f), format!("{parent}/{f}").as_bytes());
            files += 1;
        }
        if depth > 0 {
            for d in 0..branching {
                let child = self.add_folder(parent, &format!("dir-{}", d));
                files += self.add_tree(&child, depth - 1, branching);
            }
        }
        files
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn node(&self, id: &str) -> Result<&Node> {
        self.nodes.get(id).ok_or_else(|| anyhow!("itemNotFound: {}", id))
    }

    fn lookup(&self, start: &str, path: &str) -> Result<&Node> {
        let mut node = self.node(start)?;
        for seg in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
            let next = node
                .children
                .iter()
                .filter_map(|id| self.nodes.get(id))
                .find(|n| n.item.name == seg)
                .ok_or_else(|| anyhow!("itemNotFound: {}", path))?;
            node = next;
        }
        Ok(node)
    }

    fn list(&self, node: &Node) -> Result<Vec<DriveItem>> {
        if node.fail {
            return Err(anyhow!("listing {} failed", node.item.name));
        }
        if node.item.folder.is_none() {
            return Err(anyhow!("{} is not a folder", node.item.name));
        }
        Ok(node
            .children
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|n| n.item.clone())
            .collect())
    }

    fn content(&self, node: &Node) -> Result<Vec<u8>> {
        if node.fail {
            return Err(anyhow!("download of {} failed", node.item.name));
        }
        if node.item.file.is_none() {
            return Err(anyhow!("{} is not a file", node.item.name));
        }
        Ok(node.content.clone())
    }
}

#[async_trait]
impl RemoteDrive for MockDrive {
    fn authenticated(&self) -> bool {
        self.authenticated
    }

    async fn me(&self) -> Result<UserProfile> {
        Ok(UserProfile {
            display_name: "Test User".to_string(),
            mail: Some("test@example.com".to_string()),
            user_principal_name: None,
        })
    }

    async fn resolve_share_link(&self, link: &str) -> Result<DriveItem> {
        if link != SHARE_LINK {
            return Err(anyhow!("unknown share link {}", link));
        }
        Ok(self.node(ROOT_ID)?.item.clone())
    }

    async fn list_children(&self, item: &ItemRef, path: Option<&str>) -> Result<Vec<DriveItem>> {
        self.enter().await;
        let res = self
            .lookup(&item.item_id, path.unwrap_or(""))
            .and_then(|n| self.list(n));
        self.leave();
        res
    }

    async fn download_item(&self, item: &DriveItem) -> Result<Vec<u8>> {
        self.enter().await;
        let res = self.node(&item.id).and_then(|n| self.content(n));
        self.leave();
        res
    }

    async fn get_item(&self, item: &ItemRef, path: &str) -> Result<DriveItem> {
        let node = self.lookup(&item.item_id, path)?;
        Ok(node.item.clone().with_default_drive_id(&item.drive_id))
    }

    async fn get_item_content(&self, item: &ItemRef, path: &str) -> Result<Vec<u8>> {
        self.enter().await;
        let res = self.lookup(&item.item_id, path).and_then(|n| self.content(n));
        self.leave();
        res
    }
}
