//! Record tables: extraction output (TSV / JSON) and update input.

use anyhow::{Context, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Write;

use crate::error::W2mError;

/// One extracted document: its path plus the values of every configured field,
/// in configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub path: String,
    pub fields: Vec<(String, Vec<String>)>,
}

impl DocumentRecord {
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, values)| values.as_slice())
    }

    /// Column names: `path` followed by the field names.
    pub fn keys(&self) -> Vec<&str> {
        std::iter::once("path")
            .chain(self.fields.iter().map(|(name, _)| name.as_str()))
            .collect()
    }
}

impl Serialize for DocumentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("path", &self.path)?;
        for (name, values) in &self.fields {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// Tab-separated, every cell JSON-quoted, lists joined with `", "`.
    #[default]
    Tsv,
    /// Pretty-printed JSON array of records.
    Json,
}

/// Write `rows` as a table. Nothing is written when there are no rows.
/// The TSV header comes from the first row.
pub fn write_table<W: Write>(out: &mut W, rows: &[DocumentRecord], format: TableFormat) -> Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    match format {
        TableFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
        }
        TableFormat::Tsv => {
            let keys = first.keys();
            writeln!(out, "{}", keys.join("\t"))?;
            for row in rows {
                let cells = keys
                    .iter()
                    .map(|key| {
                        let cell = if *key == "path" {
                            row.path.clone()
                        } else {
                            row.get(key).map(|v| v.join(", ")).unwrap_or_default()
                        };
                        serde_json::to_string(&cell)
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                writeln!(out, "{}", cells.join("\t"))?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// One row of update input: the document to rewrite and the new field values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateRecord {
    pub path: String,
    pub values: BTreeMap<String, Value>,
}

impl UpdateRecord {
    /// New text for `field`: strings as-is, lists joined with `", "`, absent or
    /// null as the empty string.
    pub fn value_for(&self, field: &str) -> String {
        match self.values.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
            Some(other) => other.to_string(),
        }
    }

    fn from_object(mut object: serde_json::Map<String, Value>, row: usize) -> Result<Self> {
        let path = match object.remove("path") {
            Some(Value::String(p)) if !p.is_empty() => p,
            _ => {
                return Err(W2mError::malformed(format!("row {}: missing \"path\"", row)).into());
            }
        };
        Ok(Self {
            path,
            values: object.into_iter().collect(),
        })
    }
}

/// Parse update input: a JSON array of objects (input starting with `[`), or a
/// TSV table whose first non-empty line is the header. TSV cells starting with
/// `"` are decoded as JSON strings. Every row needs a non-empty `path`.
pub fn parse_update_table(text: &str) -> Result<Vec<UpdateRecord>> {
    let text = text.trim_start_matches('\u{feff}');
    if text.trim_start().starts_with('[') {
        let rows: Vec<serde_json::Map<String, Value>> = serde_json::from_str(text)
            .map_err(|e| W2mError::malformed(format!("invalid JSON table: {}", e)))?;
        return rows
            .into_iter()
            .enumerate()
            .map(|(i, obj)| UpdateRecord::from_object(obj, i + 1))
            .collect();
    }

    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| l.split('\t').map(str::trim).collect::<Vec<_>>());
    let Some(header) = lines.next() else {
        return Ok(Vec::new());
    };
    if !header.contains(&"path") {
        return Err(W2mError::malformed("table header has no \"path\" column").into());
    }

    let mut records = Vec::new();
    for (i, cells) in lines.enumerate() {
        let row = i + 1;
        let mut object = serde_json::Map::new();
        for (col, key) in header.iter().enumerate() {
            let raw = cells.get(col).copied().unwrap_or("");
            let value = if raw.starts_with('"') {
                serde_json::from_str::<String>(raw)
                    .with_context(|| format!("row {} column {:?}", row, key))
                    .map_err(|e| W2mError::malformed(format!("{:#}", e)))?
            } else {
                raw.to_string()
            };
            object.insert(key.to_string(), Value::String(value));
        }
        records.push(UpdateRecord::from_object(object, row)?);
    }
    Ok(records)
}
