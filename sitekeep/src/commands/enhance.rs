//! `sitekeep enhance`: SEO and accessibility fixes for every page.

use anyhow::Result;
use tracing::debug;

use super::{Backup, PassContext, Summary};
use crate::core::enhance::{EnhanceOptions, enhance};

pub fn run(ctx: &PassContext<'_>, pages: &[String]) -> Result<Summary> {
    ctx.paths.ensure_site_dir()?;
    let files = ctx.pages_or_all(pages);
    Ok(ctx.rewrite_files(&files, Backup::Skip, |path, html| {
        let file_stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        let options = EnhanceOptions {
            lang: &ctx.cfg.default_lang,
            site_name: &ctx.cfg.site_name,
            file_stem,
        };
        Ok(enhance(html, &options).map(|enhanced| {
            debug!(path = %path.display(), fixes = ?enhanced.fixes, "enhanced");
            enhanced.html
        }))
    }))
}
