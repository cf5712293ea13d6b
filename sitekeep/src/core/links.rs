//! Classification and lexical resolution of `href`/`src` attribute values.
//!
//! Everything here is pure: filesystem lookups go through [`TargetProbe`] so
//! the resolution order can be exercised against an in-memory site.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(href|src)=("|')([^"']+)("|')"#).expect("valid attribute regex")
});

static INDEX_HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href=("|')([^"']*index\.html)("|')"#).expect("valid index href regex")
});

/// How an attribute value should be treated by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkValue<'a> {
    /// External URL, other scheme, fragment-only or empty value.
    NonLocal,
    /// `javascript:void(...)` placeholder, rewritten to `#`.
    Placeholder,
    Local(LocalLink<'a>),
}

/// A local reference split into its path, query and fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalLink<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

impl LocalLink<'_> {
    /// Append the original query and fragment to a rewritten path.
    pub fn with_suffix(&self, path: &str) -> String {
        let mut out = path.to_string();
        if let Some(query) = self.query {
            out.push('?');
            out.push_str(query);
        }
        if let Some(fragment) = self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }
}

/// Classify a raw attribute value.
pub fn classify(value: &str) -> LinkValue<'_> {
    let value = value.trim();
    if value.is_empty() || value.starts_with('#') {
        return LinkValue::NonLocal;
    }
    if value.starts_with("javascript:void") {
        return LinkValue::Placeholder;
    }
    if value.starts_with("//") || has_scheme(value) {
        return LinkValue::NonLocal;
    }
    let link = split_local(value);
    if link.path.is_empty() {
        return LinkValue::NonLocal;
    }
    LinkValue::Local(link)
}

/// True for `http:`, `mailto:`, `data:` and any other `scheme:` prefix.
pub(crate) fn has_scheme(value: &str) -> bool {
    let Some(colon) = value.find(':') else {
        return false;
    };
    let scheme = &value[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn split_local(value: &str) -> LocalLink<'_> {
    let (rest, fragment) = match value.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment).filter(|f| !f.is_empty())),
        None => (value, None),
    };
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query).filter(|q| !q.is_empty())),
        None => (rest, None),
    };
    LocalLink {
        path,
        query,
        fragment,
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path from `base_dir` to `target`, `/`-separated.
///
/// Both inputs are expected to be normalized and share the same anchoring
/// (both absolute or both relative to the same directory).
pub fn relative_path(target: &Path, base_dir: &Path) -> String {
    let target: Vec<Component<'_>> = target.components().collect();
    let base: Vec<Component<'_>> = base_dir.components().collect();
    let common = target
        .iter()
        .zip(&base)
        .take_while(|(left, right)| left == right)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..base.len() {
        parts.push("..".to_string());
    }
    for component in &target[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// What a probed path turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Dir,
}

/// Existence checks used by the resolver.
pub trait TargetProbe {
    fn kind(&self, path: &Path) -> Option<TargetKind>;
}

/// Where the page being rewritten lives, plus the site layout rules.
#[derive(Debug, Clone)]
pub struct PageContext<'a> {
    /// Site directory (all root-like links resolve against it).
    pub site_dir: &'a Path,
    /// Directory containing the page.
    pub page_dir: &'a Path,
    /// Top-level folders that mark a path as site-rooted (`pages`, `assets`, ...).
    pub root_folders: &'a [String],
    /// Folder used by the parent-stripping fallbacks (`pages`).
    pub fallback_dir: &'a str,
}

impl PageContext<'_> {
    fn is_root_like(&self, path: &str) -> bool {
        path.starts_with('/')
            || self.root_folders.iter().any(|folder| {
                path.strip_prefix(folder.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
            })
    }

    /// Candidate targets for `path`, in the order they should be tried.
    pub fn candidates(&self, path: &str) -> Vec<PathBuf> {
        let primary = if self.is_root_like(path) {
            normalize(&self.site_dir.join(path.trim_start_matches('/')))
        } else {
            normalize(&self.page_dir.join(path))
        };
        let mut out = vec![primary];

        let mut stripped = path;
        while let Some(rest) = stripped.strip_prefix("./") {
            stripped = rest;
        }
        if stripped.starts_with("../") {
            let mut rest = stripped;
            loop {
                if let Some(next) = rest.strip_prefix("../") {
                    rest = next;
                } else if let Some(next) = rest.strip_prefix("./") {
                    rest = next;
                } else {
                    break;
                }
            }
            out.push(normalize(
                &self.site_dir.join(self.fallback_dir).join(rest),
            ));
        }

        out.push(normalize(
            &self
                .site_dir
                .join(self.fallback_dir)
                .join(path.trim_start_matches('/')),
        ));
        out.dedup();
        out
    }
}

/// Pick the first candidate that exists.
///
/// Directories resolve to their `index.html` when one exists.
pub fn resolve_target<P: TargetProbe>(candidates: &[PathBuf], probe: &P) -> Option<PathBuf> {
    for candidate in candidates {
        match probe.kind(candidate) {
            Some(TargetKind::File) => return Some(candidate.clone()),
            Some(TargetKind::Dir) => {
                let index = candidate.join("index.html");
                if probe.kind(&index) == Some(TargetKind::File) {
                    return Some(index);
                }
                return Some(candidate.clone());
            }
            None => {}
        }
    }
    None
}

/// Rewrite a single attribute value. `None` means "leave unchanged".
pub fn rewrite_value<P: TargetProbe>(
    value: &str,
    page: &PageContext<'_>,
    probe: &P,
) -> Option<String> {
    match classify(value) {
        LinkValue::NonLocal => None,
        LinkValue::Placeholder => Some("#".to_string()),
        LinkValue::Local(link) => {
            let target = resolve_target(&page.candidates(link.path), probe)?;
            let rewritten = link.with_suffix(&relative_path(&target, page.page_dir));
            (rewritten != value).then_some(rewritten)
        }
    }
}

/// Rewrite every `href`/`src` attribute of `html` relative to the page.
pub fn relink_html<P: TargetProbe>(html: &str, page: &PageContext<'_>, probe: &P) -> String {
    ATTR_RE
        .replace_all(html, |caps: &Captures<'_>| {
            match rewrite_value(&caps[3], page, probe) {
                Some(value) => format!("{}={}{}{}", &caps[1], &caps[2], value, &caps[4]),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Point every local `href` ending in `index.html` at `home`, the page's
/// relative path to the site root index.
pub fn point_home_links(html: &str, home: &str) -> String {
    INDEX_HREF_RE
        .replace_all(html, |caps: &Captures<'_>| {
            if matches!(classify(&caps[2]), LinkValue::Local(_)) {
                format!("href={}{}{}", &caps[1], home, &caps[3])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct FakeSite {
        files: HashSet<PathBuf>,
        dirs: HashSet<PathBuf>,
    }

    impl FakeSite {
        fn new(files: &[&str]) -> Self {
            let files: HashSet<PathBuf> = files.iter().map(PathBuf::from).collect();
            let mut dirs = HashSet::new();
            for file in &files {
                let mut parent = file.parent();
                while let Some(dir) = parent {
                    dirs.insert(dir.to_path_buf());
                    parent = dir.parent();
                }
            }
            Self { files, dirs }
        }
    }

    impl TargetProbe for FakeSite {
        fn kind(&self, path: &Path) -> Option<TargetKind> {
            if self.files.contains(path) {
                Some(TargetKind::File)
            } else if self.dirs.contains(path) {
                Some(TargetKind::Dir)
            } else {
                None
            }
        }
    }

    fn folders() -> Vec<String> {
        ["pages", "assets", "css", "js", "fonts"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn site() -> FakeSite {
        FakeSite::new(&[
            "/site/index.html",
            "/site/css/style.css",
            "/site/pages/blog/index.html",
            "/site/pages/blog/post-1.html",
            "/site/pages/books/books.html",
            "/site/pages/contact/index.html",
        ])
    }

    #[test]
    fn non_local_values_are_classified_as_such() {
        for value in [
            "http://example.com",
            "https://example.com/a.html",
            "mailto:a@b.c",
            "tel:+123",
            "#top",
            "",
            "//cdn.example.com/lib.js",
            "data:image/png;base64,AAAA",
        ] {
            assert_eq!(classify(value), LinkValue::NonLocal, "{value}");
        }
        assert_eq!(classify("javascript:void(0);"), LinkValue::Placeholder);
    }

    #[test]
    fn local_value_splits_query_and_fragment() {
        let LinkValue::Local(link) = classify("post-1.html?x=1#intro") else {
            panic!("expected local link");
        };
        assert_eq!(link.path, "post-1.html");
        assert_eq!(link.query, Some("x=1"));
        assert_eq!(link.fragment, Some("intro"));
        assert_eq!(link.with_suffix("../a.html"), "../a.html?x=1#intro");
    }

    #[test]
    fn normalize_collapses_parent_segments() {
        assert_eq!(
            normalize(Path::new("/site/pages/blog/../../index.html")),
            PathBuf::from("/site/index.html")
        );
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("../a/./b")), PathBuf::from("../a/b"));
    }

    #[test]
    fn relative_path_walks_up_and_down() {
        assert_eq!(
            relative_path(Path::new("/site/index.html"), Path::new("/site/pages/blog")),
            "../../index.html"
        );
        assert_eq!(
            relative_path(
                Path::new("/site/pages/books/books.html"),
                Path::new("/site/pages/blog")
            ),
            "../books/books.html"
        );
        assert_eq!(relative_path(Path::new("/site"), Path::new("/site")), ".");
    }

    #[test]
    fn correct_relative_link_is_left_unchanged() {
        let folders = folders();
        let page = PageContext {
            site_dir: Path::new("/site"),
            page_dir: Path::new("/site/pages/blog"),
            root_folders: &folders,
            fallback_dir: "pages",
        };
        assert_eq!(rewrite_value("../../index.html", &page, &site()), None);
    }

    #[test]
    fn root_absolute_link_becomes_relative() {
        let folders = folders();
        let page = PageContext {
            site_dir: Path::new("/site"),
            page_dir: Path::new("/site/pages/contact"),
            root_folders: &folders,
            fallback_dir: "pages",
        };
        assert_eq!(
            rewrite_value("/index.html#top", &page, &site()),
            Some("../../index.html#top".to_string())
        );
        assert_eq!(
            rewrite_value("css/style.css", &page, &site()),
            Some("../../css/style.css".to_string())
        );
    }

    #[test]
    fn parent_segments_fall_back_under_pages() {
        let folders = folders();
        let page = PageContext {
            site_dir: Path::new("/site"),
            page_dir: Path::new("/site"),
            root_folders: &folders,
            fallback_dir: "pages",
        };
        assert_eq!(
            rewrite_value("../books/books.html", &page, &site()),
            Some("pages/books/books.html".to_string())
        );
        assert_eq!(
            rewrite_value("books/books.html", &page, &site()),
            Some("pages/books/books.html".to_string())
        );
    }

    #[test]
    fn directory_link_resolves_to_index() {
        let folders = folders();
        let page = PageContext {
            site_dir: Path::new("/site"),
            page_dir: Path::new("/site/pages/blog"),
            root_folders: &folders,
            fallback_dir: "pages",
        };
        assert_eq!(
            rewrite_value("../contact", &page, &site()),
            Some("../contact/index.html".to_string())
        );
    }

    #[test]
    fn unresolvable_link_is_left_unchanged() {
        let folders = folders();
        let page = PageContext {
            site_dir: Path::new("/site"),
            page_dir: Path::new("/site/pages/blog"),
            root_folders: &folders,
            fallback_dir: "pages",
        };
        assert_eq!(rewrite_value("missing.html", &page, &site()), None);
    }

    #[test]
    fn relink_html_keeps_external_links_and_rewrites_placeholders() {
        let folders = folders();
        let page = PageContext {
            site_dir: Path::new("/site"),
            page_dir: Path::new("/site/pages/contact"),
            root_folders: &folders,
            fallback_dir: "pages",
        };
        let html = concat!(
            r#"<a href="https://example.com">x</a>"#,
            r#"<a href='mailto:me@example.com'>m</a>"#,
            r##"<a href="#top">t</a>"##,
            r#"<a href="javascript:void(0)">v</a>"#,
            r#"<a HREF="/pages/blog/index.html">b</a>"#,
        );
        let out = relink_html(html, &page, &site());
        assert!(out.contains(r#"href="https://example.com""#));
        assert!(out.contains(r#"href='mailto:me@example.com'"#));
        assert!(out.contains(r##"href="#top""##));
        assert!(out.contains(r##"href="#">v"##));
        assert!(out.contains(r#"HREF="../blog/index.html""#));
        assert_eq!(relink_html(&out, &page, &site()), out);
    }

    #[test]
    fn home_links_point_at_site_index() {
        let html = r#"<a href="index.html">Home</a><a HREF='../blog/index.html'>Blog</a><a href="https://x.test/index.html">x</a><a href="about.html">About</a>"#;
        assert_eq!(
            point_home_links(html, "../../index.html"),
            r#"<a href="../../index.html">Home</a><a href='../../index.html'>Blog</a><a href="https://x.test/index.html">x</a><a href="about.html">About</a>"#
        );
    }
}
