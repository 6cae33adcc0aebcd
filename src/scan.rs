//! TagLog scanning primitives
//!
//! The dialect has no attributes, no namespaces, and one nesting level
//! (block tag → field tags), so scanning is a case-insensitive substring
//! search rather than a grammar-driven parser. Every component that reads
//! TagLog goes through this module; nothing else re-implements tag matching.

use std::ops::Range;

/// Find `needle` in `haystack[from..]`, ignoring ASCII case.
///
/// Tag names are ASCII identifiers, so byte-wise comparison is enough: an
/// ASCII byte never occurs inside a multi-byte UTF-8 sequence, which keeps
/// every match position a valid char boundary.
pub(crate) fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay = haystack.as_bytes();
    let pat = needle.as_bytes();
    if pat.is_empty() || hay.len() < pat.len() || from > hay.len() - pat.len() {
        return None;
    }
    (from..=hay.len() - pat.len()).find(|&i| hay[i..i + pat.len()].eq_ignore_ascii_case(pat))
}

/// Byte range of the inner text of the first `<tag>...</tag>` pair at or
/// after `from`, plus the position just past the closing tag.
///
/// The first closer after the opener wins — the shortest possible span,
/// matching across line breaks.
fn inner_span(text: &str, tag: &str, from: usize) -> Option<(Range<usize>, usize)> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let open_at = find_ci(text, &open, from)?;
    let inner_start = open_at + open.len();
    let close_at = find_ci(text, &close, inner_start)?;
    Some((inner_start..close_at, close_at + close.len()))
}

/// Extract the trimmed inner text of the first `<tag>...</tag>` in `block`.
///
/// Absence is a normal, silent outcome: the empty string. Never panics.
pub fn extract_tag(block: &str, tag: &str) -> String {
    match inner_span(block, tag, 0) {
        Some((span, _)) => block[span].trim().to_string(),
        None => String::new(),
    }
}

/// Iterator over the successive inner spans of a repeating block tag.
pub struct BlockScanner<'a> {
    text: &'a str,
    tag: &'a str,
    pos: usize,
}

impl<'a> Iterator for BlockScanner<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let (span, resume) = inner_span(self.text, self.tag, self.pos)?;
        self.pos = resume;
        Some(&self.text[span])
    }
}

/// All inner blocks of `<tag>...</tag>` in `text`, in order of appearance.
pub fn blocks<'a>(text: &'a str, tag: &'a str) -> BlockScanner<'a> {
    BlockScanner { text, tag, pos: 0 }
}
