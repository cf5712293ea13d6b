//! `sitekeep hash-links`: turn `href="#"` control anchors into buttons.

use anyhow::Result;
use tracing::debug;

use super::{Backup, PassContext, Summary};
use crate::core::hash_links::convert;

pub fn run(ctx: &PassContext<'_>, pages: &[String]) -> Result<Summary> {
    ctx.paths.ensure_site_dir()?;
    let files = ctx.pages_or_all(pages);
    Ok(ctx.rewrite_files(&files, Backup::Skip, |path, html| {
        Ok(convert(html).map(|(updated, count)| {
            debug!(path = %path.display(), count, "anchors converted");
            updated
        }))
    }))
}
