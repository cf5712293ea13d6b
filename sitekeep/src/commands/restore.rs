//! `sitekeep restore`: recover main content from git history.

use anyhow::{Result, anyhow};
use tracing::{debug, info};

use super::backfill::{listed_pages, settle};
use super::{Backup, PassContext, Summary};
use crate::core::backfill::{MAIN_CONTENT_MARKERS, extract_main_content, has_marker, plan};
use crate::io::git::History;

/// Content of `path` at `commit`, or at the newest revision that still has
/// main content.
fn historical_page<H: History>(history: &H, path: &str, commit: Option<&str>) -> Result<String> {
    if let Some(commit) = commit {
        return history
            .show(commit, path)?
            .ok_or_else(|| anyhow!("{path} not present at {commit}"));
    }
    for rev in history.revisions(path)? {
        let Some(content) = history.show(&rev, path)? else {
            continue;
        };
        if has_marker(&content, MAIN_CONTENT_MARKERS) {
            debug!(path = %path, rev = %rev, "found revision with main content");
            return Ok(content);
        }
    }
    Err(anyhow!("no revision of {path} has main content"))
}

pub fn run<H: History>(
    ctx: &PassContext<'_>,
    history: &H,
    commit: Option<&str>,
    pages: &[String],
) -> Result<Summary> {
    ctx.paths.ensure_site_dir()?;
    let files = listed_pages(ctx, pages, &ctx.cfg.restore.pages);
    Ok(ctx.rewrite_files(&files, Backup::Once, |path, html| {
        let page = ctx.paths.site_relative(path);
        if has_marker(html, MAIN_CONTENT_MARKERS) {
            info!(page = %page, "main content present, skipping");
            return Ok(None);
        }
        let old = historical_page(history, &ctx.paths.root_relative(path), commit)?;
        let fragment = extract_main_content(&old)
            .ok_or_else(|| anyhow!("historical {page} has no </header>"))?;
        settle(&page, plan(html, fragment, MAIN_CONTENT_MARKERS))
    }))
}
