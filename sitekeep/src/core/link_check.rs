//! Link and asset collection plus file-URL resolution for the link checker.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use scraper::Html;
use serde::Serialize;
use url::Url;

use crate::core::audit::selector;
use crate::core::links::has_scheme;

/// References and anchor names found in one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    /// `a[href]` values.
    pub hrefs: Vec<String>,
    /// `img[src]`, `script[src]` and stylesheet `link[href]` values.
    pub assets: Vec<String>,
    /// Every `id` plus `a[name]` values.
    pub anchors: BTreeSet<String>,
}

pub fn collect(html: &str) -> Result<PageLinks> {
    let document = Html::parse_document(html);
    let mut links = PageLinks::default();

    for anchor in document.select(&selector("a[href]")?) {
        if let Some(href) = anchor.value().attr("href") {
            links.hrefs.push(href.to_string());
        }
    }
    for asset in document.select(&selector("img[src], script[src]")?) {
        if let Some(src) = asset.value().attr("src") {
            links.assets.push(src.to_string());
        }
    }
    for sheet in document.select(&selector("link[rel~=stylesheet][href]")?) {
        if let Some(href) = sheet.value().attr("href") {
            links.assets.push(href.to_string());
        }
    }
    for element in document.select(&selector("[id]")?) {
        if let Some(id) = element.value().attr("id") {
            links.anchors.insert(id.to_string());
        }
    }
    for named in document.select(&selector("a[name]")?) {
        if let Some(name) = named.value().attr("name") {
            links.anchors.insert(name.to_string());
        }
    }
    Ok(links)
}

/// How a reference should be checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Remote, scheme-qualified or empty: not checked.
    Skip,
    /// `#id` on the same page.
    SamePage(String),
    /// A file on disk, with an optional fragment to look up in it.
    File {
        path: PathBuf,
        fragment: Option<String>,
    },
}

/// Resolve `value` found in `page` (an absolute path). Root-relative values
/// resolve under `site_dir`; the path is percent-decoded.
pub fn resolve(value: &str, page: &Path, site_dir: &Path) -> Reference {
    let value = value.trim();
    if value.is_empty() || value.starts_with("//") || has_scheme(value) {
        return Reference::Skip;
    }
    if let Some(id) = value.strip_prefix('#') {
        if id.is_empty() {
            return Reference::Skip;
        }
        return Reference::SamePage(id.to_string());
    }

    let base = if value.starts_with('/') {
        Url::from_directory_path(site_dir)
    } else {
        Url::from_file_path(page)
    };
    let Ok(base) = base else {
        return Reference::Skip;
    };
    let Ok(mut url) = base.join(value.trim_start_matches('/')) else {
        return Reference::Skip;
    };
    let fragment = url
        .fragment()
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string);
    url.set_fragment(None);
    url.set_query(None);
    match url.to_file_path() {
        Ok(path) => Reference::File { path, fragment },
        Err(()) => Reference::Skip,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Site-relative page path.
    pub page: String,
    pub link: String,
    /// Where the target was expected, for missing files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub pages: usize,
    pub missing_files: Vec<Finding>,
    pub missing_assets: Vec<Finding>,
    pub broken_anchors: Vec<Finding>,
}

impl LinkReport {
    pub fn issue_count(&self) -> usize {
        self.missing_files.len() + self.missing_assets.len() + self.broken_anchors.len()
    }
}
