//! Per-file progress events sent to the CLI while a recursive download runs.

use std::path::PathBuf;

/// One file written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadProgress {
    /// Bytes written for this file.
    pub bytes: u64,
    /// Local path of the written file.
    pub path: PathBuf,
}

impl DownloadProgress {
    /// Size in KiB (for display as `12.34kb`).
    pub fn size_kb(&self) -> f64 {
        self.bytes as f64 / 1024.0
    }

    /// Display line: right-aligned size in kb, then the path relative to `base` when possible.
    pub fn display_line(&self, base: &std::path::Path) -> String {
        let shown = self.path.strip_prefix(base).unwrap_or(&self.path);
        format!("{:>8.2}kb - {}", self.size_kb(), shown.display())
    }
}
