//! Git adapter for history lookups.
//!
//! Restoring page content only needs two read-only queries, so we keep a
//! small, explicit wrapper around `git` subprocess calls.

use std::path::PathBuf;
use std::process::{Command, Output};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument};

/// Read access to the revision history of files.
pub trait History {
    /// Revisions touching `path` (relative to the project root), newest first.
    fn revisions(&self, path: &str) -> Result<Vec<String>>;

    /// Content of `path` at `rev`; `None` when the path is absent there.
    fn show(&self, rev: &str, path: &str) -> Result<Option<String>>;
}

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    fn run_capture(&self, args: &[&str]) -> Result<String> {
        let output = self.run_checked(args)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn run_checked(&self, args: &[&str]) -> Result<Output> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git {} failed: {}", args.join(" "), stderr.trim()));
        }
        Ok(output)
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))
    }
}

impl History for Git {
    #[instrument(skip_all, fields(path = %path))]
    fn revisions(&self, path: &str) -> Result<Vec<String>> {
        let out = self.run_capture(&["log", "--pretty=%H", "--", path])?;
        let revs: Vec<String> = out
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        debug!(count = revs.len(), "revisions listed");
        Ok(revs)
    }

    #[instrument(skip_all, fields(rev = %rev, path = %path))]
    fn show(&self, rev: &str, path: &str) -> Result<Option<String>> {
        let spec = format!("{rev}:./{path}");
        let output = self.run(&["show", &spec])?;
        if !output.status.success() {
            debug!(
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "path not present at revision"
            );
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestRepo;

    #[test]
    fn revisions_are_newest_first() {
        let repo = TestRepo::new().expect("repo");
        let first = repo.commit_file("frontend/a.html", "one").expect("commit");
        let second = repo.commit_file("frontend/a.html", "two").expect("commit");
        repo.commit_file("frontend/b.html", "other").expect("commit");

        let git = Git::new(repo.root());
        let revs = git.revisions("frontend/a.html").expect("revisions");
        assert_eq!(revs, vec![second.clone(), first.clone()]);
        assert_eq!(
            git.show(&first, "frontend/a.html").expect("show"),
            Some("one".to_string())
        );
    }

    #[test]
    fn missing_path_or_history_is_no_data() {
        let repo = TestRepo::new().expect("repo");
        let rev = repo.commit_file("frontend/a.html", "one").expect("commit");
        let git = Git::new(repo.root());
        assert_eq!(git.show(&rev, "frontend/missing.html").expect("show"), None);
        assert!(git.revisions("frontend/missing.html").expect("revisions").is_empty());
    }
}
