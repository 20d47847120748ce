//! Two-stage node selection: structural query, then pattern.

use anyhow::Result;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::tree::{Block, Document, TextNode};

/// Which text nodes of a document are candidates for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeQuery {
    /// Paragraph text after the last top-level thematic break (`---`).
    /// Documents without a break have no candidates.
    #[default]
    AfterLastRule,
    /// Text of every top-level paragraph.
    AnyParagraph,
}

impl NodeQuery {
    /// Candidate text nodes in document order.
    pub fn select<'d>(&self, doc: &'d Document) -> Vec<&'d TextNode> {
        let blocks = doc.blocks();
        let start = match self {
            NodeQuery::AfterLastRule => {
                match blocks.iter().rposition(|b| matches!(b, Block::ThematicBreak)) {
                    Some(idx) => idx + 1,
                    None => return Vec::new(),
                }
            }
            NodeQuery::AnyParagraph => 0,
        };
        blocks[start..]
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(nodes) => Some(nodes.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

/// Structural query plus a regex whose group 1 is the label prefix and group 2
/// the value list.
#[derive(Debug, Clone)]
pub struct Selector {
    query: NodeQuery,
    pattern: Regex,
}

impl Selector {
    pub fn new(query: NodeQuery, pattern: Regex) -> Result<Self> {
        // captures_len counts the implicit whole-match group.
        if pattern.captures_len() < 3 {
            anyhow::bail!(
                "pattern {:?} needs two capture groups (label prefix, values)",
                pattern.as_str()
            );
        }
        Ok(Self { query, pattern })
    }

    /// `^(<label>:\s*)(.*)` with the label taken literally.
    pub fn for_label(query: NodeQuery, label: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r"^({}:\s*)(.*)", regex::escape(label)))?;
        Self::new(query, pattern)
    }

    pub fn query(&self) -> NodeQuery {
        self.query
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Selected nodes whose text matches, with the captures.
    pub fn matches<'d>(&self, doc: &'d Document) -> Vec<(&'d TextNode, Captures<'d>)> {
        self.query
            .select(doc)
            .into_iter()
            .filter_map(|node| self.pattern.captures(&node.value).map(|caps| (node, caps)))
            .collect()
    }
}
