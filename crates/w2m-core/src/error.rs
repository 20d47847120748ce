//! Error taxonomy shared by the CLI commands.
//!
//! Most code returns `anyhow::Result`; these variants are the ones a caller
//! may want to tell apart (e.g. tests asserting a precondition failure).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum W2mError {
    #[error("OneDrive client is not authenticated. Login first.")]
    NotAuthenticated,

    #[error("{command} needs a root. use 'w2m resolve <share-link>' to set root.")]
    MissingRoot { command: &'static str },

    #[error("{command} does not work on share links directly. use 'w2m resolve <share-link>' to set root.")]
    ShareLinkPath { command: &'static str },

    #[error("Refusing to overwrite {}", .0.display())]
    RefuseOverwrite(PathBuf),

    #[error("Recursive target needs to be a directory: {}", .0.display())]
    RecursiveTargetNotDir(PathBuf),

    #[error("invalid root path {0:?}: expected /drives/<driveId>/items/<itemId>")]
    InvalidRootPath(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u32, url: String },
}

impl W2mError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        W2mError::MalformedInput(msg.into())
    }
}
