//! Duplicate `<h1>` removal.

use std::sync::LazyLock;

use regex::Regex;

static H1_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h1\b").expect("valid h1 regex"));

static LEADING_H1_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(<body\b[^>]*>\s*)<h1\b[\s\S]*?</h1>\s*").expect("valid leading h1 regex")
});

pub fn count_h1(html: &str) -> usize {
    H1_OPEN_RE.find_iter(html).count()
}

/// Remove the `<h1>` directly following `<body>` when the page has more than one.
///
/// Returns `None` when the page is left as is.
pub fn remove_leading_duplicate_h1(html: &str) -> Option<String> {
    if count_h1(html) < 2 {
        return None;
    }
    let updated = LEADING_H1_RE.replacen(html, 1, "${1}");
    (updated != html).then(|| updated.into_owned())
}
