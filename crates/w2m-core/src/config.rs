use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::{FieldDescriptor, NodeQuery};

/// One `[[fields]]` entry: a named output column and how to find it in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Output column name (e.g. `topics`).
    pub field: String,
    /// Paragraph label preceding the values (e.g. `Topics` for `Topics: a, b`).
    pub label: String,
    /// Structural query selecting candidate text nodes.
    #[serde(default)]
    pub query: NodeQuery,
    /// Optional raw regex overriding the label-derived one. Group 1 must capture
    /// the prefix to keep, group 2 the value list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl FieldConfig {
    pub fn new(field: &str, label: &str) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            query: NodeQuery::default(),
            pattern: None,
        }
    }

    /// Compile into a descriptor usable by the extractor.
    pub fn to_descriptor(&self) -> Result<FieldDescriptor> {
        match &self.pattern {
            Some(p) => FieldDescriptor::with_pattern(&self.field, self.query, p),
            None => FieldDescriptor::labeled(&self.field, self.query, &self.label),
        }
        .with_context(|| format!("invalid field config for {:?}", self.field))
    }
}

/// Global configuration loaded from `~/.config/w2m/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct W2mConfig {
    /// Maximum number of concurrent transfers/listings during `get -r`.
    pub max_concurrent_downloads: usize,
    /// Base URL of the Microsoft Graph API.
    pub graph_base_url: String,
    /// JSON file holding `{accessToken, expiresOn}`, relative to the working directory.
    pub tokens_file: PathBuf,
    /// Session state file (`{root, cwd}`), relative to the working directory.
    pub state_file: PathBuf,
    /// Connect timeout for Graph requests, in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Whole-request timeout for Graph requests, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Document fields handled by `extract` and `update`.
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldConfig>,
}

fn default_connect_timeout() -> u64 {
    15
}

fn default_request_timeout() -> u64 {
    120
}

fn default_fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::new("topics", "Topics"),
        FieldConfig::new("products", "Products"),
    ]
}

impl Default for W2mConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: 8,
            graph_base_url: "https://graph.microsoft.com/v1.0".to_string(),
            tokens_file: PathBuf::from("tokens.json"),
            state_file: PathBuf::from(".hlx-blk.json"),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            fields: default_fields(),
        }
    }
}

impl W2mConfig {
    /// Compile every configured field into a descriptor.
    pub fn field_descriptors(&self) -> Result<Vec<FieldDescriptor>> {
        self.fields.iter().map(FieldConfig::to_descriptor).collect()
    }

    /// Concurrency for recursive downloads, never below 1.
    pub fn download_concurrency(&self) -> usize {
        self.max_concurrent_downloads.max(1)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("w2m")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<W2mConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but at an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<W2mConfig> {
    if !path.exists() {
        let default_cfg = W2mConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: W2mConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
