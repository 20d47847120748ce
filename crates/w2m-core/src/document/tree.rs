//! Flat block view of a Markdown document with source offsets for text runs.

use pulldown_cmark::{Event, Options, Parser, Tag};
use std::ops::Range;

/// A run of plain text directly inside a paragraph. Soft line breaks are folded
/// in as `\n`; inline markup (emphasis, links, code, hard breaks) ends a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    /// Text as rendered (entities and escapes resolved).
    pub value: String,
    /// Byte range of the run in the document source.
    pub range: Range<usize>,
}

/// Top-level block of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    ThematicBreak,
    Paragraph(Vec<TextNode>),
    /// Headings, lists, code blocks, quotes, HTML, tables...
    Other,
}

#[derive(Debug, Clone)]
pub struct Document {
    source: String,
    blocks: Vec<Block>,
}

impl Document {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let blocks = parse_blocks(&source);
        Self { source, blocks }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_source(self) -> String {
        self.source
    }

    /// Replace byte ranges of the source and re-parse. Ranges must not overlap.
    pub(crate) fn splice(&mut self, mut edits: Vec<(Range<usize>, String)>) {
        if edits.is_empty() {
            return;
        }
        edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
        for (range, text) in edits {
            self.source.replace_range(range, &text);
        }
        self.blocks = parse_blocks(&self.source);
    }
}

fn push_text(run: &mut Option<TextNode>, text: &str, range: Range<usize>) {
    match run {
        Some(node) => {
            node.value.push_str(text);
            node.range.end = range.end;
        }
        None => {
            *run = Some(TextNode {
                value: text.to_string(),
                range,
            })
        }
    }
}

fn flush(run: &mut Option<TextNode>, para: &mut Option<Vec<TextNode>>) {
    if let (Some(node), Some(nodes)) = (run.take(), para.as_mut()) {
        nodes.push(node);
    }
}

fn parse_blocks(src: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut para: Option<Vec<TextNode>> = None;
    let mut run: Option<TextNode> = None;

    for (event, range) in Parser::new_ext(src, Options::empty()).into_offset_iter() {
        let in_para = depth == 1 && para.is_some();
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    if matches!(tag, Tag::Paragraph) {
                        para = Some(Vec::new());
                    } else {
                        blocks.push(Block::Other);
                    }
                } else if in_para {
                    flush(&mut run, &mut para);
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    flush(&mut run, &mut para);
                    if let Some(nodes) = para.take() {
                        blocks.push(Block::Paragraph(nodes));
                    }
                }
            }
            Event::Rule if depth == 0 => blocks.push(Block::ThematicBreak),
            Event::Text(text) if in_para => push_text(&mut run, &text, range),
            Event::SoftBreak if in_para => push_text(&mut run, "\n", range),
            _ if in_para => flush(&mut run, &mut para),
            _ => {}
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraphs(doc: &Document) -> Vec<Vec<String>> {
        doc.blocks()
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(nodes) => Some(nodes.iter().map(|n| n.value.clone()).collect()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn block_sequence() {
        let doc = Document::parse("# Title\n\nIntro text.\n\n---\n\nTopics: a, b\n\n- item\n");
        let kinds: Vec<&str> = doc
            .blocks()
            .iter()
            .map(|b| match b {
                Block::ThematicBreak => "hr",
                Block::Paragraph(_) => "p",
                Block::Other => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["other", "p", "hr", "p", "other"]);
    }

    #[test]
    fn soft_breaks_fold_into_one_node() {
        let doc = Document::parse("Topics: a\nProducts: b\n");
        assert_eq!(paragraphs(&doc), vec![vec!["Topics: a\nProducts: b".to_string()]]);
    }

    #[test]
    fn inline_markup_splits_nodes() {
        let doc = Document::parse("Topics: *bold* tail `code` end\n");
        assert_eq!(
            paragraphs(&doc),
            vec![vec!["Topics: ".to_string(), " tail ".to_string(), " end".to_string()]]
        );
    }

    #[test]
    fn ranges_point_into_source() {
        let src = "---\n\nTopics: a, b, c\n";
        let doc = Document::parse(src);
        let Block::Paragraph(nodes) = &doc.blocks()[1] else {
            panic!("expected paragraph");
        };
        assert_eq!(&src[nodes[0].range.clone()], "Topics: a, b, c");
    }

    #[test]
    fn nested_rules_are_not_top_level() {
        let doc = Document::parse("> ---\n> Topics: x\n");
        assert_eq!(doc.blocks(), &[Block::Other]);
    }

    #[test]
    fn splice_rewrites_and_reparses() {
        let mut doc = Document::parse("A: 1\n\nB: 2\n");
        doc.splice(vec![(3..4, "10".to_string()), (9..10, "20".to_string())]);
        assert_eq!(doc.source(), "A: 10\n\nB: 20\n");
        assert_eq!(
            paragraphs(&doc),
            vec![vec!["A: 10".to_string()], vec!["B: 20".to_string()]]
        );
    }
}
