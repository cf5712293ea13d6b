//! `sitekeep sync-nav`: copy the canonical navigation block into every page.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use tracing::{info, warn};

use super::{Backup, PassContext, Summary};
use crate::core::nav::{BlockMarker, canonicalize, localize, sync_page};
use crate::io::encoding::{Encoding, read_with_fallback};

/// `<stem>.utf8.html` next to the template.
fn utf8_copy_path(template: &Path) -> PathBuf {
    let stem = template
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    template.with_file_name(format!("{stem}.utf8.html"))
}

pub fn run(ctx: &PassContext<'_>, template: Option<&str>) -> Result<Summary> {
    ctx.paths.ensure_site_dir()?;
    let template_path = ctx
        .paths
        .root_path(template.unwrap_or(&ctx.cfg.nav.template));
    if !template_path.is_file() {
        return Err(anyhow!(
            "navigation template not found: {}",
            template_path.display()
        ));
    }

    let (text, encoding) = read_with_fallback(&template_path)?;
    if encoding != Encoding::Utf8 {
        info!(%encoding, "template decoded with fallback encoding");
    }
    let marker = BlockMarker::new(&ctx.cfg.nav.start_marker)?;
    let range = marker.find(&text).ok_or_else(|| {
        anyhow!(
            "no '{}' block in {}",
            ctx.cfg.nav.start_marker,
            template_path.display()
        )
    })?;
    let canonical = canonicalize(&text[range], &ctx.cfg.nav.template_location);

    let copy = utf8_copy_path(&template_path);
    if let Err(err) = ctx.write(&copy, &text, Backup::Skip) {
        warn!("{err:#}");
    }

    let files: Vec<PathBuf> = ctx
        .pages_or_all(&[])
        .into_iter()
        .filter(|path| *path != template_path && *path != copy)
        .collect();
    Ok(ctx.rewrite_files(&files, Backup::Skip, |path, html| {
        let page = ctx.paths.site_relative(path);
        Ok(sync_page(html, &marker, &localize(&canonical, &page)))
    }))
}
