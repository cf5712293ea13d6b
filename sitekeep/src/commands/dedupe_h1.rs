//! `sitekeep dedupe-h1`: drop the site-wide `<h1>` that duplicates a page heading.

use anyhow::Result;

use super::{Backup, PassContext, Summary};
use crate::core::headings::remove_leading_duplicate_h1;

pub fn run(ctx: &PassContext<'_>, pages: &[String]) -> Result<Summary> {
    ctx.paths.ensure_site_dir()?;
    let files = ctx.pages_or_all(pages);
    Ok(ctx.rewrite_files(&files, Backup::Once, |_, html| {
        Ok(remove_leading_duplicate_h1(html))
    }))
}
