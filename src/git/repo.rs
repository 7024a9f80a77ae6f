//! Branch repository adapter
//!
//! Thin, semantically named compositions of git invocations. Nothing here
//! retries; every failure is surfaced with git's own diagnostic text.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::{debug, info};

use super::{GitError, GitExecutor};
use crate::models::{BranchName, DEFAULT_REMOTE};

/// git reports overlapping changes with `CONFLICT (<kind>): ...` lines and a
/// closing "Automatic merge failed" line; every other non-zero merge exit is
/// an ordinary command failure.
static CONFLICT_REPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^CONFLICT \(|Automatic merge failed").expect("conflict pattern is valid")
});

/// Where a branch can be merged from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchLocation {
    Local,
    Remote,
    Missing,
}

/// Which push variant [`BranchRepo::push`] ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushMode {
    Plain,
    SetUpstream,
}

pub struct BranchRepo<E> {
    git: E,
    remote: String,
}

impl<E: GitExecutor> BranchRepo<E> {
    pub fn new(git: E) -> Self {
        Self::with_remote(git, DEFAULT_REMOTE)
    }

    pub fn with_remote(git: E, remote: impl Into<String>) -> Self {
        Self {
            git,
            remote: remote.into(),
        }
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Update every remote-tracking branch
    pub fn fetch_all(&self) -> Result<(), GitError> {
        info!("fetching all remotes");
        self.git.execute(&["fetch", "--all"])?;
        Ok(())
    }

    /// Remote-tracking branches of the configured remote, as `origin/<name>`,
    /// in git's listing order.
    pub fn list_remote_branches(&self) -> Result<Vec<String>, GitError> {
        let output = self.git.execute(&["branch", "-r"])?;
        let prefix = format!("{}/", self.remote);
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with(&prefix) && !line.contains(" -> "))
            .map(String::from)
            .collect())
    }

    /// Local and remote-tracking branches whose tips are reachable from HEAD.
    pub fn list_merged_branches(&self) -> Result<BTreeSet<BranchName>, GitError> {
        let output = self.git.execute(&["branch", "--all", "--merged"])?;
        Ok(output
            .lines()
            .filter_map(|line| BranchName::normalize(line, &self.remote))
            .collect())
    }

    /// True iff `candidate`'s history is contained in `of`.
    ///
    /// `merge-base --is-ancestor` exits 1 for "not an ancestor"; any other
    /// failure (unknown revision, broken repository) is an error.
    pub fn is_ancestor(&self, candidate: &str, of: &str) -> Result<bool, GitError> {
        match self
            .git
            .execute(&["merge-base", "--is-ancestor", candidate, of])
        {
            Ok(_) => Ok(true),
            Err(GitError::Command {
                exit_code: Some(1),
                ..
            }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create or update local `<name>` from `<remote>/<name>`
    pub fn fetch_branch(&self, name: &BranchName) -> Result<(), GitError> {
        info!(branch = %name, remote = %self.remote, "fetching branch");
        let refspec = format!("{name}:{name}");
        self.git.execute(&["fetch", &self.remote, &refspec])?;
        Ok(())
    }

    pub fn local_branch_exists(&self, name: &BranchName) -> bool {
        self.ref_exists(&format!("refs/heads/{name}"))
    }

    pub fn remote_branch_exists(&self, name: &BranchName) -> bool {
        self.ref_exists(&format!("refs/remotes/{}/{name}", self.remote))
    }

    fn ref_exists(&self, full_ref: &str) -> bool {
        self.git
            .execute(&["show-ref", "--verify", "--quiet", full_ref])
            .is_ok()
    }

    /// Local ref first, then the remote-tracking ref.
    pub fn locate(&self, name: &BranchName) -> BranchLocation {
        if self.local_branch_exists(name) {
            BranchLocation::Local
        } else if self.remote_branch_exists(name) {
            BranchLocation::Remote
        } else {
            BranchLocation::Missing
        }
    }

    /// Non-fast-forward merge of `source` into the checked-out `current`.
    ///
    /// On conflict the working tree is left mid-merge.
    pub fn merge_into(&self, source: &str, current: &str, message: &str) -> Result<(), GitError> {
        info!(%source, %current, "merging");
        match self.git.execute(&["merge", "--no-ff", source, "-m", message]) {
            Ok(_) => Ok(()),
            Err(GitError::Command { output, .. }) if is_conflict_report(&output) => {
                Err(GitError::MergeConflict {
                    source_ref: source.to_string(),
                    output,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// `git add .`
    pub fn stage_all(&self) -> Result<(), GitError> {
        self.git.execute(&["add", "."])?;
        Ok(())
    }

    pub fn commit(&self, message: &str) -> Result<(), GitError> {
        self.git.execute(&["commit", "-m", message])?;
        Ok(())
    }

    pub fn abort_merge(&self) -> Result<(), GitError> {
        self.git.execute(&["merge", "--abort"])?;
        Ok(())
    }

    /// True while a merge is waiting to be committed or aborted
    pub fn merge_in_progress(&self) -> bool {
        self.git
            .execute(&["rev-parse", "-q", "--verify", "MERGE_HEAD"])
            .is_ok()
    }

    pub fn current_branch(&self) -> Result<BranchName, GitError> {
        let output = self.git.execute(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let name = output.trim();
        if name.is_empty() || name == "HEAD" {
            return Err(GitError::DetachedHead);
        }
        Ok(BranchName::new(name))
    }

    /// Absence of an upstream is an expected state, so every failure reads
    /// as `false`.
    pub fn has_upstream(&self, branch: &BranchName) -> bool {
        let upstream = format!("{branch}@{{u}}");
        self.git
            .execute(&["rev-parse", "--abbrev-ref", &upstream])
            .is_ok()
    }

    /// Push the current branch, configuring `<remote>/<branch>` as upstream
    /// on the first push.
    pub fn push(&self) -> Result<PushMode, GitError> {
        let branch = self.current_branch()?;
        if self.has_upstream(&branch) {
            debug!(%branch, "upstream configured, plain push");
            self.git.execute(&["push"])?;
            Ok(PushMode::Plain)
        } else {
            info!(%branch, remote = %self.remote, "no upstream, pushing with --set-upstream");
            self.git
                .execute(&["push", "--set-upstream", &self.remote, branch.as_str()])?;
            Ok(PushMode::SetUpstream)
        }
    }
}

/// Whether failed `git merge` output reports conflicting changes
pub fn is_conflict_report(output: &str) -> bool {
    CONFLICT_REPORT.is_match(output)
}
