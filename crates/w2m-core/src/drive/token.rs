//! Access token loading.
//!
//! Tokens are acquired by a separate login flow and dropped into a JSON file
//! (`{"accessToken": "...", "expiresOn": <unix seconds>}`); this module only
//! reads them. `AZURE_WORD2MD_ACCESS_TOKEN` takes precedence over the file.

use serde::Deserialize;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

pub const ACCESS_TOKEN_ENV: &str = "AZURE_WORD2MD_ACCESS_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub access_token: String,
    /// Expiry as unix seconds; `None` means "assume valid".
    #[serde(default)]
    pub expires_on: Option<i64>,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_on: None,
        }
    }

    pub fn is_valid_at(&self, now_unix: i64) -> bool {
        !self.access_token.is_empty() && self.expires_on.map_or(true, |exp| exp > now_unix)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(unix_timestamp())
    }

    /// Token from the environment, else from `tokens_file`. Missing or unreadable
    /// sources yield `None` (the client then reports itself unauthenticated).
    pub fn load(tokens_file: &Path) -> Option<Self> {
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            if !token.trim().is_empty() {
                return Some(Self::new(token.trim()));
            }
        }
        Self::load_file(tokens_file)
    }

    pub fn load_file(tokens_file: &Path) -> Option<Self> {
        let data = match std::fs::read_to_string(tokens_file) {
            Ok(d) => d,
            Err(e) => {
                tracing::debug!("no token file at {}: {}", tokens_file.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&data) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!("ignoring unreadable token file {}: {}", tokens_file.display(), e);
                None
            }
        }
    }
}

pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
