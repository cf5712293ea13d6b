//! `sitekeep resolve-conflicts` and `sitekeep strip-markers`.

use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

use super::{Backup, NonUtf8, PassContext, Summary};
use crate::core::conflicts::{resolve_incoming, strip_marker_lines};
use crate::io::backup::is_backup;
use crate::io::site::list_all_files;

/// Every non-backup file under the given paths (relative to the project
/// root), or under the configured conflict paths.
fn scan_files(ctx: &PassContext<'_>, args: &[String]) -> Vec<PathBuf> {
    let roots = if args.is_empty() {
        &ctx.cfg.conflict_paths
    } else {
        args
    };
    let mut files = Vec::new();
    for root in roots {
        let path = ctx.paths.root_path(root);
        if !path.exists() {
            warn!(path = %path.display(), "path not found, skipping");
            continue;
        }
        files.extend(
            list_all_files(&path)
                .into_iter()
                .filter(|file| !is_backup(file)),
        );
    }
    files
}

/// Keep the incoming side of every conflict block.
pub fn resolve(ctx: &PassContext<'_>, paths: &[String]) -> Result<Summary> {
    let files = scan_files(ctx, paths);
    Ok(ctx.rewrite_files_with(&files, Backup::Once, NonUtf8::Ignore, |_, text| {
        Ok(resolve_incoming(text))
    }))
}

/// Delete stray marker lines.
pub fn strip(ctx: &PassContext<'_>, paths: &[String]) -> Result<Summary> {
    let files = scan_files(ctx, paths);
    Ok(ctx.rewrite_files_with(&files, Backup::Once, NonUtf8::Ignore, |_, text| {
        Ok(strip_marker_lines(text))
    }))
}
