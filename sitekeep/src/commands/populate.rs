//! `sitekeep populate`: give zero-byte placeholder pages minimal content.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::warn;

use super::blog_nav::BLOG_DIR;
use super::{Backup, PassContext, Summary};
use crate::core::placeholders::{
    POST_SUBTITLE, post_title, profile_title, render_post, render_profile,
};
use crate::io::encoding::read_utf8;

fn read_template(path: &Path) -> Result<String> {
    read_utf8(path)
        .with_context(|| format!("read template {}", path.display()))?
        .ok_or_else(|| anyhow!("template {} is not valid UTF-8", path.display()))
}

pub fn run(ctx: &PassContext<'_>) -> Result<Summary> {
    ctx.paths.ensure_site_dir()?;
    let cfg = &ctx.cfg.placeholders;
    let template_path = ctx.paths.page_path(&cfg.blog_template);
    if !template_path.is_file() {
        return Err(anyhow!("blog template not found: {}", template_path.display()));
    }
    let template = read_template(&template_path)?;

    let blog_dir = ctx.paths.site_dir.join(BLOG_DIR);
    let posts: Vec<PathBuf> = (1..=cfg.max_post)
        .map(|number| blog_dir.join(format!("post-{number}.html")))
        .filter(|path| path.is_file())
        .collect();
    let mut summary = ctx.rewrite_files(&posts, Backup::Skip, |path, html| {
        if !html.is_empty() {
            return Ok(None);
        }
        let number = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.strip_prefix("post-"))
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| anyhow!("unexpected post file name"))?;
        Ok(Some(render_post(&template, &post_title(number), POST_SUBTITLE)))
    });

    let home_path = ctx.paths.site_dir.join("index.html");
    let home = match read_template(&home_path) {
        Ok(home) => home,
        Err(err) => {
            warn!("{err:#}, profile pages not populated");
            return Ok(summary);
        }
    };
    let profiles: Vec<PathBuf> = cfg
        .profile_pages
        .iter()
        .map(|page| ctx.paths.page_path(page))
        .filter(|path| path.is_file())
        .collect();
    let profile_summary = ctx.rewrite_files(&profiles, Backup::Skip, |path, html| {
        if !html.is_empty() {
            return Ok(None);
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Some(render_profile(&home, &profile_title(&name), &ctx.cfg.site_name)))
    });
    summary.changed.extend(profile_summary.changed);
    summary.skipped.extend(profile_summary.skipped);
    Ok(summary)
}
