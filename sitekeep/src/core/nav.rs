//! Canonical navigation block: extraction, canonicalization and per-page
//! localization.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Result, anyhow};
use regex::{Captures, Regex, RegexBuilder};

use crate::core::links::{LinkValue, classify, normalize, relative_path};

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(href=)("|')([^"']*)("|')"#).expect("valid href regex")
});

/// Start marker plus the element it opens, compiled for block lookup.
#[derive(Debug, Clone)]
pub struct BlockMarker {
    start: Regex,
    element: Regex,
    element_name: String,
}

impl BlockMarker {
    /// Build from a literal start marker such as `<ul class="nav-menu">`.
    ///
    /// Whitespace runs in the marker match any whitespace; matching is
    /// case-insensitive. The block ends at the end tag of the same element.
    pub fn new(start_marker: &str) -> Result<Self> {
        let element_name = start_marker
            .trim_start()
            .strip_prefix('<')
            .map(|rest| {
                rest.chars()
                    .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
                    .collect::<String>()
            })
            .filter(|name| !name.is_empty())
            .ok_or_else(|| anyhow!("nav start marker must open an element: '{start_marker}'"))?
            .to_ascii_lowercase();

        let pattern = start_marker
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        let start = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|err| anyhow!("compile nav start marker: {err}"))?;
        let element = RegexBuilder::new(&format!(r"<(/?){}\b[^>]*>", regex::escape(&element_name)))
            .case_insensitive(true)
            .build()
            .map_err(|err| anyhow!("compile nav element pattern: {err}"))?;

        Ok(Self {
            start,
            element,
            element_name,
        })
    }

    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    /// Byte range of the first block, from the start marker through its end tag.
    pub fn find(&self, html: &str) -> Option<Range<usize>> {
        self.find_from(html, 0)
    }

    /// Like [`BlockMarker::find`], starting the search at byte `from`.
    pub fn find_from(&self, html: &str, from: usize) -> Option<Range<usize>> {
        let start = self.start.find_at(html, from)?;
        let mut depth = 1usize;
        for caps in self.element.captures_iter(&html[start.end()..]) {
            let whole = caps.get(0)?;
            if &caps[1] == "/" {
                depth -= 1;
                if depth == 0 {
                    return Some(start.start()..start.end() + whole.end());
                }
            } else if !whole.as_str().ends_with("/>") {
                depth += 1;
            }
        }
        None
    }
}

/// Rewrite every local href of `snippet` to a site-absolute path (`/pages/...`).
///
/// `location` is the site-relative path of the file the snippet was taken
/// from; relative links are resolved against its directory.
pub fn canonicalize(snippet: &str, location: &str) -> String {
    let base = Path::new("/").join(location);
    let base_dir = base.parent().unwrap_or(Path::new("/")).to_path_buf();
    HREF_RE
        .replace_all(snippet, |caps: &Captures<'_>| {
            let LinkValue::Local(link) = classify(&caps[3]) else {
                return caps[0].to_string();
            };
            let absolute = if link.path.starts_with('/') {
                normalize(Path::new(link.path))
            } else {
                normalize(&base_dir.join(link.path))
            };
            let value = link.with_suffix(&absolute.to_string_lossy());
            format!("{}{}{}{}", &caps[1], &caps[2], value, &caps[4])
        })
        .into_owned()
}

/// Site-absolute href paths in `snippet`, longest first.
pub fn absolute_targets(snippet: &str) -> Vec<String> {
    let mut targets: Vec<String> = HREF_RE
        .captures_iter(snippet)
        .filter_map(|caps| match classify(&caps[3]) {
            LinkValue::Local(link) if link.path.starts_with('/') => Some(link.path.to_string()),
            _ => None,
        })
        .collect();
    targets.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    targets.dedup();
    targets
}

/// Substitute each absolute target with its path relative to `page`.
///
/// `page` is the site-relative path of the page receiving the snippet.
/// Substitution only touches whole href values (a target followed by a
/// quote, `#` or `?`) and runs longest target first.
pub fn localize(canonical: &str, page: &str) -> String {
    let page_dir: PathBuf = Path::new("/")
        .join(page)
        .parent()
        .unwrap_or(Path::new("/"))
        .to_path_buf();
    let mut out = canonical.to_string();
    for target in absolute_targets(canonical) {
        let relative = relative_path(Path::new(&target), &page_dir);
        let pattern = format!(r#"(href=["']){}(["'#?])"#, regex::escape(&target));
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        out = re
            .replace_all(&out, |caps: &Captures<'_>| {
                format!("{}{}{}", &caps[1], relative, &caps[2])
            })
            .into_owned();
    }
    out
}

/// Replace every block of the page with `snippet`. `None` when the page has
/// no block or every block already equals the snippet.
pub fn sync_page(page_html: &str, marker: &BlockMarker, snippet: &str) -> Option<String> {
    let mut out = String::with_capacity(page_html.len() + snippet.len());
    let mut copied = 0;
    let mut changed = false;
    while let Some(range) = marker.find_from(page_html, copied) {
        out.push_str(&page_html[copied..range.start]);
        out.push_str(snippet);
        changed |= page_html[range.clone()] != *snippet;
        copied = range.end;
    }
    if !changed {
        return None;
    }
    out.push_str(&page_html[copied..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE_NAV: &str = r#"<ul  class="nav-menu">
  <li><a href="../../index.html">Home</a></li>
  <li class="dropdown"><a href="index.html">Blog</a>
    <ul class="dropdown-menu"><li><a href="categories.html#all">Categories</a></li></ul>
  </li>
  <li><a href="../books/books.html">Books</a></li>
  <li><a href="https://example.com">Shop</a></li>
</ul>"#;

    fn marker() -> BlockMarker {
        BlockMarker::new(r#"<ul class="nav-menu">"#).expect("marker")
    }

    #[test]
    fn find_spans_nested_lists() {
        let html = format!("<header>{TEMPLATE_NAV}</header><ul><li>other</li></ul>");
        let range = marker().find(&html).expect("block");
        assert_eq!(&html[range], TEMPLATE_NAV);
    }

    #[test]
    fn marker_must_name_an_element() {
        assert!(BlockMarker::new("nav-menu").is_err());
        assert_eq!(marker().element_name(), "ul");
    }

    #[test]
    fn canonicalize_resolves_against_template_location() {
        let canonical = canonicalize(TEMPLATE_NAV, "pages/blog/index.html");
        assert!(canonical.contains(r#"href="/index.html""#));
        assert!(canonical.contains(r#"href="/pages/blog/index.html""#));
        assert!(canonical.contains(r#"href="/pages/blog/categories.html#all""#));
        assert!(canonical.contains(r#"href="/pages/books/books.html""#));
        assert!(canonical.contains(r#"href="https://example.com""#));
    }

    #[test]
    fn targets_are_longest_first() {
        let canonical = canonicalize(TEMPLATE_NAV, "pages/blog/index.html");
        let targets = absolute_targets(&canonical);
        assert_eq!(targets.last().map(String::as_str), Some("/index.html"));
        let position = |t: &str| targets.iter().position(|x| x == t).expect("target");
        assert!(position("/pages/blog/index.html") < position("/index.html"));
    }

    #[test]
    fn localize_computes_per_page_paths() {
        let canonical = canonicalize(TEMPLATE_NAV, "pages/blog/index.html");

        let root = localize(&canonical, "index.html");
        assert!(root.contains(r#"href="index.html">Home"#));
        assert!(root.contains(r#"href="pages/blog/index.html">Blog"#));
        assert!(root.contains(r#"href="pages/blog/categories.html#all""#));

        let contact = localize(&canonical, "pages/contact/index.html");
        assert!(contact.contains(r#"href="../../index.html">Home"#));
        assert!(contact.contains(r#"href="../blog/index.html">Blog"#));
        assert!(contact.contains(r#"href="../books/books.html""#));
    }

    #[test]
    fn sync_page_replaces_block_once() {
        let canonical = canonicalize(TEMPLATE_NAV, "pages/blog/index.html");
        let snippet = localize(&canonical, "pages/about/about-us.html");
        let page = r#"<header><ul class="nav-menu"><li>old</li></ul></header><main></main>"#;
        let updated = sync_page(page, &marker(), &snippet).expect("updated");
        assert!(updated.starts_with("<header><ul  class=\"nav-menu\">"));
        assert!(updated.ends_with("</ul></header><main></main>"));
        assert_eq!(sync_page(&updated, &marker(), &snippet), None);
        assert_eq!(sync_page("<main></main>", &marker(), &snippet), None);
    }

    #[test]
    fn sync_page_replaces_every_block() {
        let page = r#"<header><ul class="nav-menu"><li>old</li></ul></header><div class="mobile"><ul class="nav-menu"><li>old</li></ul></div>"#;
        let snippet = r#"<ul class="nav-menu"><li>new</li></ul>"#;
        let updated = sync_page(page, &marker(), snippet).expect("updated");
        assert_eq!(
            updated,
            r#"<header><ul class="nav-menu"><li>new</li></ul></header><div class="mobile"><ul class="nav-menu"><li>new</li></ul></div>"#
        );
        assert!(!updated.contains("old"));
        assert_eq!(sync_page(&updated, &marker(), snippet), None);

        let half = page.replacen("<li>old</li>", "<li>new</li>", 1);
        assert_eq!(sync_page(&half, &marker(), snippet), Some(updated));
    }
}
