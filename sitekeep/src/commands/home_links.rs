//! `sitekeep home-links`: point every `index.html` link at the site root index.

use anyhow::Result;

use super::{Backup, PassContext, Summary};
use crate::core::links::{point_home_links, relative_path};

pub fn run(ctx: &PassContext<'_>, pages: &[String]) -> Result<Summary> {
    ctx.paths.ensure_site_dir()?;
    let files = ctx.pages_or_all(pages);
    let home = ctx.paths.site_dir.join("index.html");
    Ok(ctx.rewrite_files(&files, Backup::Skip, |path, html| {
        let page_dir = path.parent().unwrap_or(&ctx.paths.site_dir);
        Ok(Some(point_home_links(html, &relative_path(&home, page_dir))))
    }))
}
