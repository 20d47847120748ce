use anyhow::Result;
use regex::Regex;

use super::escape::escape_text;
use super::selector::{NodeQuery, Selector};
use super::table::UpdateRecord;
use super::tree::Document;

/// A named field and the selector that locates it.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    field: String,
    selector: Selector,
}

impl FieldDescriptor {
    pub fn new(field: &str, selector: Selector) -> Self {
        Self {
            field: field.to_string(),
            selector,
        }
    }

    /// Field written as `<label>: v1, v2` in a paragraph.
    pub fn labeled(field: &str, query: NodeQuery, label: &str) -> Result<Self> {
        Ok(Self::new(field, Selector::for_label(query, label)?))
    }

    /// Field located by a custom regex (group 1 = kept prefix, group 2 = values).
    pub fn with_pattern(field: &str, query: NodeQuery, pattern: &str) -> Result<Self> {
        Ok(Self::new(field, Selector::new(query, Regex::new(pattern)?)?))
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// All comma-separated values of every matching node, trimmed, empties dropped,
    /// in document order.
    pub fn extract(&self, doc: &Document) -> Vec<String> {
        self.selector
            .matches(doc)
            .iter()
            .flat_map(|(_, caps)| {
                caps.get(2)
                    .map_or("", |m| m.as_str())
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Replace the value list of every matching node with `new_value`, keeping the
    /// label prefix. Returns the number of rewritten nodes (0 leaves the document as is).
    ///
    /// `new_value` is plain text: Markdown-significant characters are escaped so
    /// [`extract`](Self::extract) reads back exactly what was written.
    pub fn update(&self, doc: &mut Document, new_value: &str) -> usize {
        let pattern = self.selector.pattern();
        let new_value = escape_text(new_value);
        let mut edits = Vec::new();
        for (node, _) in self.selector.matches(doc) {
            let original = &doc.source()[node.range.clone()];
            let Some(caps) = pattern.captures(original) else {
                tracing::debug!(field = %self.field, "source text differs from rendered text; skipping node");
                continue;
            };
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let prefix = caps.get(1).map_or("", |m| m.as_str());
            // `.` also matches `\r`; keep CRLF line endings intact.
            let end = if original[..whole.end()].ends_with('\r') {
                whole.end() - 1
            } else {
                whole.end()
            };
            let rewritten = format!(
                "{}{}{}{}",
                &original[..whole.start()],
                prefix,
                new_value,
                &original[end..]
            );
            edits.push((node.range.clone(), rewritten));
        }
        let count = edits.len();
        doc.splice(edits);
        count
    }

    /// [`update`](Self::update) with the value this field has in `record`.
    pub fn apply(&self, doc: &mut Document, record: &UpdateRecord) -> usize {
        self.update(doc, &record.value_for(&self.field))
    }
}
