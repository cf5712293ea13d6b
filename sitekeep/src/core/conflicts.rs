//! Leftover version-control conflict markers.

use std::sync::LazyLock;

use regex::Regex;

static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^<<<<<<<[^\n]*\n.*?^=======[^\n]*\n(.*?)^>>>>>>>[^\n]*(?:\n|\z)")
        .expect("valid conflict block regex")
});

static MARKER_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:<{7,}[^\n]*|>{7,}[^\n]*|={7,}[ \t\r]*)(?:\n|\z)")
        .expect("valid marker line regex")
});

/// True when all three delimiters appear somewhere in `text`.
pub fn has_conflict_block(text: &str) -> bool {
    text.contains("<<<<<<<") && text.contains("=======") && text.contains(">>>>>>>")
}

/// Collapse every full conflict block to its incoming side.
///
/// Returns `None` when nothing matched.
pub fn resolve_incoming(text: &str) -> Option<String> {
    if !has_conflict_block(text) || !BLOCK_RE.is_match(text) {
        return None;
    }
    Some(BLOCK_RE.replace_all(text, "${1}").into_owned())
}

/// Delete bare marker lines. Returns `None` when there were none.
pub fn strip_marker_lines(text: &str) -> Option<String> {
    if !MARKER_LINE_RE.is_match(text) {
        return None;
    }
    Some(MARKER_LINE_RE.replace_all(text, "").into_owned())
}
