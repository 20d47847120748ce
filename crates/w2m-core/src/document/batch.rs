//! File-level extract and update.

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::field::FieldDescriptor;
use super::table::{DocumentRecord, UpdateRecord};
use super::tree::Document;

fn read_document(path: &Path) -> Result<Document> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(Document::parse(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Path as shown in output: relative to `base` when it lies below it, with
/// `.` components dropped (`./docs/a.md` is shown as `docs/a.md`).
fn display_path(path: &Path, base: &Path) -> String {
    let shown = if path.is_absolute() {
        path.strip_prefix(base).unwrap_or(path)
    } else {
        path
    };
    let normalized: PathBuf = shown
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    normalized.to_string_lossy().into_owned()
}

/// Extract every field from one file.
pub fn extract_file(path: &Path, base: &Path, fields: &[FieldDescriptor]) -> Result<DocumentRecord> {
    let doc = read_document(path)?;
    let record = DocumentRecord {
        path: display_path(path, base),
        fields: fields
            .iter()
            .map(|f| (f.field().to_string(), f.extract(&doc)))
            .collect(),
    };
    tracing::debug!(?record, "extracted");
    Ok(record)
}

/// Extract from a file, or from every non-directory entry below a directory
/// (sorted by file name at each level). Paths are shown relative to `base`.
pub fn extract_path(path: &Path, base: &Path, fields: &[FieldDescriptor]) -> Result<Vec<DocumentRecord>> {
    let meta = std::fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
    if !meta.is_dir() {
        return Ok(vec![extract_file(path, base, fields)?]);
    }

    let mut rows = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walk {}", path.display()))?;
        if entry.file_type().is_dir() {
            continue;
        }
        rows.push(extract_file(entry.path(), base, fields)?);
    }
    Ok(rows)
}

/// Where the rewritten copy of `path` goes: `<path>-new.md`.
pub fn updated_path(path: &Path) -> PathBuf {
    let mut o = path.as_os_str().to_owned();
    o.push("-new.md");
    PathBuf::from(o)
}

fn rewrite(record: &UpdateRecord, base: &Path, fields: &[FieldDescriptor]) -> Result<(PathBuf, String)> {
    let src = base.join(&record.path);
    let mut doc = read_document(&src)?;
    for field in fields {
        let n = field.apply(&mut doc, record);
        if n == 0 {
            tracing::debug!(field = field.field(), path = %record.path, "field not present; left unchanged");
        }
    }
    Ok((updated_path(&src), doc.into_source()))
}

/// Apply one record and write `<path>-new.md`. Returns the written path.
pub fn update_file(record: &UpdateRecord, base: &Path, fields: &[FieldDescriptor]) -> Result<PathBuf> {
    let (out, text) = rewrite(record, base, fields)?;
    std::fs::write(&out, text).with_context(|| format!("write {}", out.display()))?;
    tracing::info!(path = %out.display(), "updated");
    Ok(out)
}

/// Apply every record. All documents are read and rewritten in memory first,
/// so an unreadable document aborts the batch before anything is written.
pub fn update_records(
    records: &[UpdateRecord],
    base: &Path,
    fields: &[FieldDescriptor],
) -> Result<Vec<PathBuf>> {
    let rewritten = records
        .iter()
        .map(|r| rewrite(r, base, fields))
        .collect::<Result<Vec<_>>>()?;

    let mut written = Vec::with_capacity(rewritten.len());
    for (out, text) in rewritten {
        std::fs::write(&out, text).with_context(|| format!("write {}", out.display()))?;
        tracing::info!(path = %out.display(), "updated");
        written.push(out);
    }
    Ok(written)
}
