//! `sitekeep blog-nav`: fix blog index "read more" links and post
//! previous/next navigation.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, warn};

use super::{Backup, PassContext, Summary};
use crate::core::blog_nav::{link_neighbors, link_read_more, post_number, post_title};
use crate::io::encoding::read_utf8;
use crate::io::site::list_pages;

pub const BLOG_DIR: &str = "pages/blog";

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `post-N.html` files directly inside `blog_dir`, ordered by number.
fn numbered_posts(blog_dir: &Path) -> Vec<PathBuf> {
    let mut posts: Vec<(u32, PathBuf)> = list_pages(blog_dir)
        .into_iter()
        .filter(|path| path.parent() == Some(blog_dir))
        .filter_map(|path| post_number(&file_name(&path)).map(|number| (number, path)))
        .collect();
    posts.sort_by_key(|(number, _)| *number);
    posts.into_iter().map(|(_, path)| path).collect()
}

/// Post title -> file name, for posts whose first `<h1>` is plain text.
fn post_titles(posts: &[PathBuf]) -> BTreeMap<String, String> {
    let mut titles = BTreeMap::new();
    for path in posts {
        match read_utf8(path) {
            Ok(Some(html)) => {
                if let Some(title) = post_title(&html) {
                    titles.insert(title, file_name(path));
                }
            }
            Ok(None) => debug!(path = %path.display(), "not utf-8, no title"),
            Err(err) => warn!("{err:#}"),
        }
    }
    titles
}

pub fn run(ctx: &PassContext<'_>) -> Result<Summary> {
    ctx.paths.ensure_site_dir()?;
    let blog_dir = ctx.paths.site_dir.join(BLOG_DIR);
    let posts = numbered_posts(&blog_dir);
    let titles = post_titles(&posts);

    let index = blog_dir.join("index.html");
    let mut summary = if index.is_file() {
        ctx.rewrite_files(&[index], Backup::Skip, |_, html| {
            Ok(link_read_more(html, &titles))
        })
    } else {
        warn!(path = %ctx.display(&index), "blog index not found");
        Summary::default()
    };

    let names: Vec<String> = posts.iter().map(|path| file_name(path)).collect();
    let neighbors: HashMap<&Path, (Option<&str>, Option<&str>)> = posts
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let prev = i.checked_sub(1).map(|p| names[p].as_str());
            let next = names.get(i + 1).map(String::as_str);
            (path.as_path(), (prev, next))
        })
        .collect();
    let posts_summary = ctx.rewrite_files(&posts, Backup::Skip, |path, html| {
        let (prev, next) = neighbors.get(path).copied().unwrap_or_default();
        Ok(link_neighbors(html, prev, next))
    });
    summary.changed.extend(posts_summary.changed);
    summary.skipped.extend(posts_summary.skipped);
    Ok(summary)
}
