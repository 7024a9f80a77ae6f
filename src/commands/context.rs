//! Everything a command needs to operate on one repository

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::fs::{StateFile, WorkDir};
use crate::git::{BranchRepo, GitCli, GitExecutor};
use crate::models::OrchestrationState;
use crate::orchestrator::{FileJournal, RepoLock};

pub struct Session {
    pub work_dir: WorkDir,
    pub config: Config,
    pub repo: BranchRepo<GitCli>,
    lock: Option<RepoLock>,
}

impl Session {
    /// Open the repository containing `path` without taking the lock.
    pub fn open(path: &Path) -> Result<Self> {
        let repo_root = find_repo_root(path)?;
        let work_dir = WorkDir::new(&repo_root);
        let config = Config::load(&work_dir.config_path())?;
        let git = GitCli::new(&repo_root).with_timeout(config.command_timeout());
        let repo = BranchRepo::with_remote(git, config.remote.clone());
        Ok(Self {
            work_dir,
            config,
            repo,
            lock: None,
        })
    }

    /// Open for a mutating command: prepare `.taskmerge/` and take the
    /// per-repository lock for the lifetime of the session.
    pub fn open_locked(path: &Path) -> Result<Self> {
        let mut session = Self::open(path)?;
        session.work_dir.ensure()?;
        let lock = RepoLock::acquire(&session.work_dir.lock_path(), session.config.lock_timeout())?;
        session.lock = Some(lock);
        Ok(session)
    }

    pub fn repo_root(&self) -> &Path {
        self.work_dir.repo_root()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    pub fn state_file(&self) -> StateFile {
        StateFile::new(self.work_dir.state_path())
    }

    pub fn load_state(&self) -> Result<Option<OrchestrationState>> {
        let state_file = self.state_file();
        state_file
            .load()
            .with_context(|| format!("Failed to load {}", state_file.path().display()))
    }

    pub fn required_branches_path(&self) -> PathBuf {
        self.config.required_branches_path(self.repo_root())
    }

    pub fn journal(&self) -> FileJournal {
        FileJournal::new(self.required_branches_path(), self.state_file())
    }
}

/// Resolve the working-tree root of the repository containing `path`.
fn find_repo_root(path: &Path) -> Result<PathBuf> {
    let git = GitCli::new(path);
    let toplevel = git
        .execute(&["rev-parse", "--show-toplevel"])
        .with_context(|| format!("{} is not inside a git working tree", path.display()))?;
    Ok(PathBuf::from(toplevel.trim()))
}
