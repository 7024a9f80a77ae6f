//! Canonical branch names
//!
//! Every branch name that enters the resolver, the orchestrator or a state
//! file goes through [`BranchName::normalize`] first, so `origin/feat-1`,
//! `remotes/origin/feat-1` and `* feat-1` all compare equal to `feat-1`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote used when the configuration does not name one
pub const DEFAULT_REMOTE: &str = "origin";

/// A local or remote-tracking branch name in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchName(String);

impl BranchName {
    /// Wrap a name that is already canonical (e.g. read back from a state file).
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Normalize one line of `git branch` output or one ref name.
    ///
    /// Strips the current/worktree markers (`* `, `+ `), the `remotes/`
    /// namespace and the `<remote>/` prefix. Returns `None` for symbolic
    /// entries (`origin/HEAD -> origin/main`), detached-HEAD placeholders and
    /// blank lines.
    pub fn normalize(raw: &str, remote: &str) -> Option<Self> {
        let mut name = raw.trim();
        if name.is_empty() || name.contains(" -> ") {
            return None;
        }

        for marker in ["* ", "+ "] {
            if let Some(rest) = name.strip_prefix(marker) {
                name = rest.trim_start();
            }
        }

        // "(HEAD detached at 1a2b3c)" and friends
        if name.starts_with('(') {
            return None;
        }

        name = name.strip_prefix("remotes/").unwrap_or(name);
        let prefix = format!("{remote}/");
        name = name.strip_prefix(prefix.as_str()).unwrap_or(name);

        if name.is_empty() || name == "HEAD" {
            return None;
        }
        Some(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Remote-tracking ref for this branch, e.g. `origin/feat-1`.
    pub fn remote_ref(&self, remote: &str) -> String {
        format!("{remote}/{}", self.0)
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BranchName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
