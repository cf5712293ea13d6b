//! `sitekeep relink`: rewrite local `href`/`src` values to page-relative paths.

use anyhow::Result;
use tracing::info;

use super::{Backup, PassContext, Summary};
use crate::core::links::{PageContext, relink_html};
use crate::io::site::DiskProbe;

pub fn run(ctx: &PassContext<'_>, pages: &[String]) -> Result<Summary> {
    ctx.paths.ensure_site_dir()?;
    let files = ctx.pages_or_all(pages);
    info!(pages = files.len(), "relinking");
    let site_dir = ctx.paths.site_dir.as_path();
    Ok(ctx.rewrite_files(&files, Backup::Skip, |path, html| {
        let page_dir = path.parent().unwrap_or(site_dir);
        let page = PageContext {
            site_dir,
            page_dir,
            root_folders: &ctx.cfg.root_folders,
            fallback_dir: &ctx.cfg.fallback_dir,
        };
        Ok(Some(relink_html(html, &page, &DiskProbe)))
    }))
}
