//! Test-only helpers for building throwaway sites and git repositories.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

use crate::io::site::SitePaths;

/// A temporary project root holding a `frontend/` site directory.
pub struct TestSite {
    temp: TempDir,
}

impl TestSite {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        fs::create_dir_all(temp.path().join("frontend")).context("create site dir")?;
        Ok(Self { temp })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn site_dir(&self) -> PathBuf {
        self.root().join("frontend")
    }

    pub fn paths(&self) -> SitePaths {
        SitePaths {
            root: self.root().to_path_buf(),
            site_dir: self.site_dir(),
        }
    }

    /// Write a file relative to the site directory, creating parents.
    pub fn write(&self, rel: &str, contents: &str) -> Result<PathBuf> {
        write_file(&self.site_dir().join(rel), contents)
    }

    /// Write a file relative to the project root, creating parents.
    pub fn write_root(&self, rel: &str, contents: &str) -> Result<PathBuf> {
        write_file(&self.root().join(rel), contents)
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        let path = self.site_dir().join(rel);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.site_dir().join(rel).exists()
    }
}

/// A [`TestSite`] that is also a git repository with a local identity.
pub struct TestRepo {
    site: TestSite,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let site = TestSite::new()?;
        let repo = Self { site };
        repo.git(&["init", "--quiet"])?;
        repo.git(&["config", "user.email", "test@example.com"])?;
        repo.git(&["config", "user.name", "test"])?;
        repo.git(&["config", "commit.gpgsign", "false"])?;
        Ok(repo)
    }

    pub fn root(&self) -> &Path {
        self.site.root()
    }

    pub fn site(&self) -> &TestSite {
        &self.site
    }

    /// Write `rel` (relative to the project root), commit it and return the
    /// new HEAD revision.
    pub fn commit_file(&self, rel: &str, contents: &str) -> Result<String> {
        self.site.write_root(rel, contents)?;
        self.git(&["add", rel])?;
        self.git(&["commit", "--quiet", "-m", &format!("update {rel}")])?;
        Ok(self.git(&["rev-parse", "HEAD"])?.trim().to_string())
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.root())
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))?;
        if !output.status.success() {
            return Err(anyhow!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(path.to_path_buf())
}

