//! Site layout: project root, site directory and file enumeration.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use walkdir::WalkDir;

use crate::core::links::{TargetKind, TargetProbe};
use crate::io::config::SiteConfig;

/// Canonical paths for a project root.
#[derive(Debug, Clone)]
pub struct SitePaths {
    pub root: PathBuf,
    pub site_dir: PathBuf,
}

impl SitePaths {
    /// Absolute paths for `root` and the configured site directory.
    pub fn new(root: &Path, cfg: &SiteConfig) -> Result<Self> {
        let root = std::path::absolute(root)
            .with_context(|| format!("resolve project root {}", root.display()))?;
        let site_dir = root.join(&cfg.site_dir);
        Ok(Self { root, site_dir })
    }

    /// Fail when the site directory does not exist.
    pub fn ensure_site_dir(&self) -> Result<()> {
        if !self.site_dir.is_dir() {
            return Err(anyhow!("site directory not found: {}", self.site_dir.display()));
        }
        Ok(())
    }

    /// `/`-separated path of `path` relative to the site directory.
    pub fn site_relative(&self, path: &Path) -> String {
        relative_display(path, &self.site_dir)
    }

    /// `/`-separated path of `path` relative to the project root.
    pub fn root_relative(&self, path: &Path) -> String {
        relative_display(path, &self.root)
    }

    /// Resolve a page argument given relative to the site directory.
    ///
    /// A leading site directory component (`frontend/pages/x.html`) is
    /// accepted as well.
    pub fn page_path(&self, arg: &str) -> PathBuf {
        let arg = arg.trim_start_matches("./");
        if let Some(name) = self.site_dir.file_name().and_then(|name| name.to_str())
            && let Some(rest) = arg.strip_prefix(name).and_then(|r| r.strip_prefix('/'))
        {
            return self.site_dir.join(rest);
        }
        self.site_dir.join(arg)
    }

    /// Resolve a path argument given relative to the project root.
    pub fn root_path(&self, arg: &str) -> PathBuf {
        self.root.join(arg)
    }
}

fn relative_display(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
}

/// Files under `dir` whose extension is one of `extensions`, sorted by path.
pub fn list_files(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    list_all_files(dir)
        .into_iter()
        .filter(|path| has_extension(path, extensions))
        .collect()
}

/// Every regular file under `dir` (or `dir` itself when it is a file).
pub fn list_all_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

/// HTML pages under `dir`.
pub fn list_pages(dir: &Path) -> Vec<PathBuf> {
    list_files(dir, &["html"])
}

/// Filesystem-backed target probe.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskProbe;

impl TargetProbe for DiskProbe {
    fn kind(&self, path: &Path) -> Option<TargetKind> {
        let meta = std::fs::metadata(path).ok()?;
        if meta.is_dir() {
            Some(TargetKind::Dir)
        } else {
            Some(TargetKind::File)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn list_files_filters_and_sorts() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        fs::create_dir_all(root.join("b")).expect("mkdir");
        fs::write(root.join("b/z.HTML"), "").expect("write");
        fs::write(root.join("a.html"), "").expect("write");
        fs::write(root.join("a.html.bak"), "").expect("write");
        fs::write(root.join("style.css"), "").expect("write");

        let pages: Vec<PathBuf> = list_pages(root)
            .into_iter()
            .map(|path| path.strip_prefix(root).expect("prefix").to_path_buf())
            .collect();
        assert_eq!(pages, vec![PathBuf::from("a.html"), PathBuf::from("b/z.HTML")]);
        assert_eq!(list_files(root, &["css", "js"]).len(), 1);
        assert_eq!(list_all_files(root).len(), 4);
    }

    #[test]
    fn page_path_accepts_site_prefix() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = SitePaths::new(temp.path(), &SiteConfig::default()).expect("paths");
        let expected = paths.site_dir.join("pages/blog/index.html");
        assert_eq!(paths.page_path("pages/blog/index.html"), expected);
        assert_eq!(paths.page_path("frontend/pages/blog/index.html"), expected);
        assert_eq!(paths.site_relative(&expected), "pages/blog/index.html");
        assert_eq!(paths.root_relative(&expected), "frontend/pages/blog/index.html");
    }

    #[test]
    fn ensure_site_dir_reports_missing_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = SitePaths::new(temp.path(), &SiteConfig::default()).expect("paths");
        let err = paths.ensure_site_dir().expect_err("missing");
        assert!(err.to_string().contains("site directory not found"));
        fs::create_dir_all(&paths.site_dir).expect("mkdir");
        paths.ensure_site_dir().expect("present");
    }

    #[test]
    fn disk_probe_distinguishes_files_and_dirs() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("f.html"), "").expect("write");
        assert_eq!(DiskProbe.kind(temp.path()), Some(TargetKind::Dir));
        assert_eq!(DiskProbe.kind(&temp.path().join("f.html")), Some(TargetKind::File));
        assert_eq!(DiskProbe.kind(&temp.path().join("nope")), None);
    }
}
