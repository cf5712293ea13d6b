//! One orchestration module per maintenance pass.
//!
//! Each pass reads files, runs a `core` transform and writes back only when
//! the content changed. A failure on one file is logged and counted as
//! skipped; it never stops the batch.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::io::backup::ensure_backup;
use crate::io::config::SiteConfig;
use crate::io::encoding::read_utf8;
use crate::io::site::SitePaths;

pub mod audit;
pub mod backfill;
pub mod blog_nav;
pub mod check_links;
pub mod conflicts;
pub mod dedupe_h1;
pub mod enhance;
pub mod hash_links;
pub mod home_links;
pub mod nav;
pub mod populate;
pub mod relink;
pub mod replace;
pub mod restore;

/// Everything a pass needs to know about the project.
#[derive(Debug, Clone)]
pub struct PassContext<'a> {
    pub cfg: &'a SiteConfig,
    pub paths: &'a SitePaths,
    /// Report what would change without writing anything.
    pub dry_run: bool,
}

/// Whether a pass copies a file to `<name>.bak` before its first rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backup {
    Skip,
    Once,
}

/// What a batch pass does with files that are not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonUtf8 {
    /// Record them as skipped.
    Report,
    /// Leave them out of the summary (binary assets in whole-tree scans).
    Ignore,
}

/// Files changed and skipped by a batch pass, as site- or root-relative paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub changed: Vec<String>,
    pub skipped: Vec<String>,
}

impl Summary {
    /// Human-readable report printed after a pass.
    pub fn render(&self, title: &str) -> String {
        let mut out = format!("{title}: {} file(s)\n", self.changed.len());
        for path in &self.changed {
            out.push_str(&format!("  {path}\n"));
        }
        if !self.skipped.is_empty() {
            out.push_str(&format!("Skipped: {} file(s)\n", self.skipped.len()));
            for path in &self.skipped {
                out.push_str(&format!("  {path}\n"));
            }
        }
        out
    }
}

impl PassContext<'_> {
    /// Write `contents` to `path`, taking a backup first when asked.
    pub fn write(&self, path: &Path, contents: &str, backup: Backup) -> Result<()> {
        if self.dry_run {
            debug!(path = %path.display(), "dry run, not writing");
            return Ok(());
        }
        if backup == Backup::Once && path.exists() {
            ensure_backup(path)?;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Display path for logs and summaries.
    pub fn display(&self, path: &Path) -> String {
        if path.starts_with(&self.paths.site_dir) {
            self.paths.site_relative(path)
        } else {
            self.paths.root_relative(path)
        }
    }

    /// HTML pages named on the command line, or every page of the site.
    pub fn pages_or_all(&self, args: &[String]) -> Vec<PathBuf> {
        if args.is_empty() {
            crate::io::site::list_pages(&self.paths.site_dir)
        } else {
            args.iter().map(|arg| self.paths.page_path(arg)).collect()
        }
    }

    /// Run `transform` over `files`, writing back changed content.
    ///
    /// `transform` returns `Ok(None)` for "nothing to do". Unreadable,
    /// non-UTF-8 and failing files are logged and recorded as skipped.
    pub fn rewrite_files<F>(&self, files: &[PathBuf], backup: Backup, transform: F) -> Summary
    where
        F: FnMut(&Path, &str) -> Result<Option<String>>,
    {
        self.rewrite_files_with(files, backup, NonUtf8::Report, transform)
    }

    /// [`PassContext::rewrite_files`] with explicit handling of non-UTF-8 files.
    pub fn rewrite_files_with<F>(
        &self,
        files: &[PathBuf],
        backup: Backup,
        non_utf8: NonUtf8,
        mut transform: F,
    ) -> Summary
    where
        F: FnMut(&Path, &str) -> Result<Option<String>>,
    {
        let mut summary = Summary::default();
        for path in files {
            let shown = self.display(path);
            let text = match read_utf8(path) {
                Ok(Some(text)) => text,
                Ok(None) => {
                    debug!(path = %shown, "not utf-8, skipping");
                    if non_utf8 == NonUtf8::Report {
                        summary.skipped.push(shown);
                    }
                    continue;
                }
                Err(err) => {
                    warn!(path = %shown, "{err:#}");
                    summary.skipped.push(shown);
                    continue;
                }
            };
            let updated = match transform(path, &text) {
                Ok(Some(updated)) if updated != text => updated,
                Ok(_) => continue,
                Err(err) => {
                    warn!(path = %shown, "{err:#}");
                    summary.skipped.push(shown);
                    continue;
                }
            };
            match self.write(path, &updated, backup) {
                Ok(()) => {
                    info!(path = %shown, "updated");
                    summary.changed.push(shown);
                }
                Err(err) => {
                    warn!(path = %shown, "{err:#}");
                    summary.skipped.push(shown);
                }
            }
        }
        summary
    }
}
