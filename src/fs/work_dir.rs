use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::WORK_DIR_NAME;

/// The `.taskmerge/` directory inside a repository.
pub struct WorkDir {
    repo_root: PathBuf,
    root: PathBuf,
}

impl WorkDir {
    pub fn new<P: AsRef<Path>>(repo_root: P) -> Self {
        let repo_root = repo_root.as_ref().to_path_buf();
        let root = repo_root.join(WORK_DIR_NAME);
        Self { repo_root, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join("state.toml")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join("merge.lock")
    }

    /// Create the directory and keep it out of `git add .`
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))?;
        self.ensure_excluded()
    }

    /// Add the work directory to `.git/info/exclude` so staging the operator's
    /// conflict resolution never picks up taskmerge's own files.
    ///
    /// Uses the exclude file rather than `.gitignore` to avoid producing a
    /// tracked change in the repository being merged.
    fn ensure_excluded(&self) -> Result<()> {
        let git_dir = self.repo_root.join(".git");
        if !git_dir.is_dir() {
            // Worktrees and submodules keep .git as a file; nothing to do
            return Ok(());
        }

        let info_dir = git_dir.join("info");
        let exclude = info_dir.join("exclude");
        let entry = format!("/{WORK_DIR_NAME}/");

        let existing = fs::read_to_string(&exclude).unwrap_or_default();
        if existing.lines().any(|line| line.trim() == entry) {
            return Ok(());
        }

        fs::create_dir_all(&info_dir)
            .with_context(|| format!("Failed to create {}", info_dir.display()))?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&exclude)
            .with_context(|| format!("Failed to open {}", exclude.display()))?;
        if !existing.is_empty() && !existing.ends_with('\n') {
            writeln!(file)?;
        }
        writeln!(file, "{entry}")
            .with_context(|| format!("Failed to update {}", exclude.display()))?;
        Ok(())
    }
}
