//! Posix-style remote path helpers.
//!
//! Remote paths are always `/`-separated regardless of the local platform.

/// Join `rel` onto the absolute remote directory `base` and normalize the result.
///
/// A `rel` starting with `/` is taken as absolute. `.` segments are dropped and
/// `..` pops a segment (never above the root). The result always starts with `/`
/// and never ends with one, except for the root itself.
pub fn join(base: &str, rel: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let start = if rel.starts_with('/') { "" } else { base };
    for seg in start.split('/').chain(rel.split('/')) {
        match seg {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    format!("/{}", parts.join("/"))
}

/// Last non-empty segment of `path` (empty for the root).
pub fn basename(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}

/// Everything before the last segment of a relative path (`"."` when there is none).
pub fn parent(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => "/",
        Some(idx) => &trimmed[..idx],
        None => ".",
    }
}

/// Relative join used for sidecar `relPath` values: `parent/name`, with `.` and
/// empty parents dropped.
pub fn rel_join(parent: &str, name: &str) -> String {
    let parent = parent.trim_end_matches('/');
    if parent.is_empty() || parent == "." {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}
