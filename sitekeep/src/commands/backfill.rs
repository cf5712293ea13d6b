//! `sitekeep backfill`: insert template content into contentless pages.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use super::{Backup, PassContext, Summary};
use crate::core::backfill::{Backfill, PROFILE_MARKERS, builtin_template, plan};
use crate::io::encoding::read_utf8;

/// Pages named on the command line, or the configured list.
pub(super) fn listed_pages(
    ctx: &PassContext<'_>,
    args: &[String],
    configured: &[String],
) -> Vec<PathBuf> {
    let names = if args.is_empty() { configured } else { args };
    names.iter().map(|name| ctx.paths.page_path(name)).collect()
}

/// Turn a [`Backfill`] decision into the new page content, if any.
pub(super) fn settle(page: &str, outcome: Backfill) -> Result<Option<String>> {
    match outcome {
        Backfill::HasContent => {
            info!(page = %page, "main content present, skipping");
            Ok(None)
        }
        Backfill::AlreadyInserted => {
            info!(page = %page, "content already inserted, skipping");
            Ok(None)
        }
        Backfill::NoHeader => Err(anyhow!("no </header> to insert after")),
        Backfill::Insert(updated) => Ok(Some(updated)),
    }
}

fn fragment_for(ctx: &PassContext<'_>, page: &str) -> Result<String> {
    if let Some(file) = ctx.cfg.backfill.fragments.get(page) {
        let path = ctx.paths.root_path(file);
        return read_utf8(&path)?
            .with_context(|| format!("fragment {} is not valid UTF-8", path.display()));
    }
    builtin_template(page)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("no fragment configured for {page}"))
}

pub fn run(ctx: &PassContext<'_>, pages: &[String]) -> Result<Summary> {
    ctx.paths.ensure_site_dir()?;
    let files = listed_pages(ctx, pages, &ctx.cfg.backfill.pages);
    Ok(ctx.rewrite_files(&files, Backup::Once, |path, html| {
        let page = ctx.paths.site_relative(path);
        let fragment = fragment_for(ctx, &page)?;
        settle(&page, plan(html, &fragment, PROFILE_MARKERS))
    }))
}
