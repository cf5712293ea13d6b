//! One-time `.bak` copies taken before a file is first rewritten.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// `<file name>.bak` next to `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".bak");
    path.with_file_name(name)
}

pub fn is_backup(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "bak")
}

/// Copy `path` to its backup unless a backup already exists.
///
/// Returns `true` when a backup was created.
pub fn ensure_backup(path: &Path) -> Result<bool> {
    let backup = backup_path(path);
    if backup.exists() {
        debug!(backup = %backup.display(), "backup already present");
        return Ok(false);
    }
    fs::copy(path, &backup)
        .with_context(|| format!("back up {} to {}", path.display(), backup.display()))?;
    debug!(backup = %backup.display(), "backup created");
    Ok(true)
}
