//! Backslash-escaping of plain text written back into Markdown source.

/// Characters that can start inline markup (code, emphasis, links, HTML, entities).
const INLINE: &[char] = &['\\', '`', '*', '_', '[', ']', '<', '>', '&'];

/// Escape `value` so it renders as exactly `value` when spliced into a paragraph.
///
/// Inline markup characters are escaped everywhere. After a newline, a leading
/// `#`, `-`, `+`, `=` or ordered-list marker (`1.`, `2)`) is escaped as well so
/// the line cannot start a block or turn the paragraph into a heading.
pub(crate) fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    for (i, line) in value.split('\n').enumerate() {
        let mut body = line;
        if i > 0 {
            out.push('\n');
            let trimmed = line.trim_start_matches(|c: char| c == ' ' || c == '\t');
            out.push_str(&line[..line.len() - trimmed.len()]);
            body = escape_line_start(trimmed, &mut out);
        }
        for c in body.chars() {
            if INLINE.contains(&c) {
                out.push('\\');
            }
            out.push(c);
        }
    }
    out
}

/// Writes an escaped block marker at the start of `line` to `out`; returns the rest.
fn escape_line_start<'a>(line: &'a str, out: &mut String) -> &'a str {
    if let Some(c) = line.chars().next().filter(|c| matches!(c, '#' | '-' | '+' | '=')) {
        out.push('\\');
        out.push(c);
        return &line[1..];
    }
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(marker) = line[digits..].chars().next().filter(|c| matches!(c, '.' | ')')) {
            out.push_str(&line[..digits]);
            out.push('\\');
            out.push(marker);
            return &line[digits + 1..];
        }
    }
    line
}
