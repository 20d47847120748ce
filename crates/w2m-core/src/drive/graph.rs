//! Microsoft Graph implementation of [`RemoteDrive`].
//!
//! Uses the curl crate (libcurl) for the HTTP side. Transfers are blocking and
//! run inside `spawn_blocking`; every call builds its own `Easy` handle, so the
//! client can be shared freely between queue tasks.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::item::{ChildrenPage, DriveItem, ItemRef, UserProfile};
use super::share::encode_share_link;
use super::token::AccessToken;
use super::RemoteDrive;
use crate::config::W2mConfig;
use crate::error::W2mError;

/// Upper bound on `@odata.nextLink` pages followed for one listing.
const MAX_PAGES: usize = 1000;

#[derive(Debug, Clone, Copy)]
struct Timeouts {
    connect: Duration,
    request: Duration,
}

/// Graph API client holding a bearer token.
#[derive(Debug, Clone)]
pub struct GraphDrive {
    base_url: Url,
    token: Option<AccessToken>,
    timeouts: Timeouts,
}

impl GraphDrive {
    /// Client for `base_url` (e.g. `https://graph.microsoft.com/v1.0`).
    pub fn new(base_url: &str, token: Option<AccessToken>) -> Result<Self> {
        let base_url = Url::parse(base_url).with_context(|| format!("invalid graph base url {base_url:?}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("graph base url cannot be a base: {}", base_url);
        }
        Ok(Self {
            base_url,
            token,
            timeouts: Timeouts {
                connect: Duration::from_secs(15),
                request: Duration::from_secs(120),
            },
        })
    }

    /// Client configured from `cfg`, with the token loaded from the environment or token file.
    pub fn from_config(cfg: &W2mConfig) -> Result<Self> {
        let token = AccessToken::load(&cfg.tokens_file);
        let mut drive = Self::new(&cfg.graph_base_url, token)?;
        drive.timeouts = Timeouts {
            connect: Duration::from_secs(cfg.connect_timeout_secs),
            request: Duration::from_secs(cfg.request_timeout_secs),
        };
        Ok(drive)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segs) = url.path_segments_mut() {
            segs.pop_if_empty();
            segs.extend(segments);
        }
        url
    }

    /// `/drives/{d}/items/{id}` or, with a path, `/drives/{d}/items/{id}:/{path}:`,
    /// followed by `tail` segments.
    fn item_url(&self, item: &ItemRef, path: Option<&str>, tail: &[&str]) -> Url {
        let parts: Vec<&str> = path
            .map(|p| p.split('/').filter(|s| !s.is_empty() && *s != ".").collect())
            .unwrap_or_default();

        let mut segments: Vec<String> = vec![
            "drives".to_string(),
            item.drive_id.clone(),
            "items".to_string(),
        ];
        match parts.split_last() {
            None => segments.push(item.item_id.clone()),
            Some((last, init)) => {
                segments.push(format!("{}:", item.item_id));
                segments.extend(init.iter().map(|s| s.to_string()));
                segments.push(format!("{}:", last));
            }
        }
        segments.extend(tail.iter().map(|s| s.to_string()));
        let refs: Vec<&str> = segments.iter().map(String::as_str).collect();
        self.endpoint(&refs)
    }

    fn bearer(&self) -> Result<String> {
        match &self.token {
            Some(t) if t.is_valid() => Ok(t.access_token.clone()),
            _ => Err(W2mError::NotAuthenticated.into()),
        }
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>> {
        let token = self.bearer()?;
        let timeouts = self.timeouts;
        tracing::debug!(%url, "graph GET");
        tokio::task::spawn_blocking(move || http_get(url.as_str(), &token, timeouts))
            .await
            .context("graph request task join")?
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let body = self.get_bytes(url.clone()).await?;
        serde_json::from_slice(&body).with_context(|| format!("decode response from {}", url))
    }
}

/// Blocking GET with a bearer token; follows redirects (content downloads are
/// answered with a redirect to a pre-authenticated URL).
fn http_get(url: &str, token: &str, timeouts: Timeouts) -> Result<Vec<u8>> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.follow_location(true)?;
    easy.connect_timeout(timeouts.connect)?;
    easy.timeout(timeouts.request)?;

    let mut list = curl::easy::List::new();
    list.append(&format!("Authorization: Bearer {}", token))?;
    easy.http_headers(list)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer
            .perform()
            .with_context(|| format!("GET {} failed", url))?;
    }

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        return Err(W2mError::Http {
            status: code,
            url: url.to_string(),
        }
        .into());
    }
    Ok(body)
}

#[async_trait]
impl RemoteDrive for GraphDrive {
    fn authenticated(&self) -> bool {
        self.token.as_ref().is_some_and(AccessToken::is_valid)
    }

    async fn me(&self) -> Result<UserProfile> {
        self.get_json(self.endpoint(&["me"])).await
    }

    async fn resolve_share_link(&self, link: &str) -> Result<DriveItem> {
        let share_id = encode_share_link(link);
        self.get_json(self.endpoint(&["shares", &share_id, "driveItem"]))
            .await
            .with_context(|| format!("resolve share link {}", link))
    }

    async fn list_children(&self, item: &ItemRef, path: Option<&str>) -> Result<Vec<DriveItem>> {
        let mut url = self.item_url(item, path, &["children"]);
        let mut items = Vec::new();
        for _ in 0..MAX_PAGES {
            let page: ChildrenPage = self.get_json(url).await?;
            items.extend(
                page.value
                    .into_iter()
                    .map(|child| child.with_default_drive_id(&item.drive_id)),
            );
            match page.next_link {
                Some(next) => {
                    url = Url::parse(&next).with_context(|| format!("invalid nextLink {next:?}"))?;
                }
                None => return Ok(items),
            }
        }
        anyhow::bail!("listing {} exceeded {} pages", item.canonical_path(), MAX_PAGES)
    }

    async fn download_item(&self, item: &DriveItem) -> Result<Vec<u8>> {
        let item_ref = item.item_ref()?;
        self.get_bytes(self.item_url(&item_ref, None, &["content"]))
            .await
            .with_context(|| format!("download {}", item.name))
    }

    async fn get_item(&self, item: &ItemRef, path: &str) -> Result<DriveItem> {
        let found: DriveItem = self.get_json(self.item_url(item, Some(path), &[])).await?;
        Ok(found.with_default_drive_id(&item.drive_id))
    }

    async fn get_item_content(&self, item: &ItemRef, path: &str) -> Result<Vec<u8>> {
        self.get_bytes(self.item_url(item, Some(path), &["content"]))
            .await
    }
}
