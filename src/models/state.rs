//! Resumable orchestration state
//!
//! Lifecycle:
//! - created when a merge run starts (`Running`)
//! - mutated branch by branch
//! - frozen on conflict (`ConflictPaused`) until the finalizer or an abort
//!   clears the conflict
//! - discarded once nothing is pending and no conflict is outstanding
//!   (`Completed`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use super::BranchName;

/// Phase derived from an [`OrchestrationState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Running,
    ConflictPaused,
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Running => write!(f, "running"),
            Phase::ConflictPaused => write!(f, "conflict-paused"),
            Phase::Completed => write!(f, "completed"),
        }
    }
}

/// The branch a run paused on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictInfo {
    pub branch: BranchName,
    pub detected_at: DateTime<Utc>,
}

impl ConflictInfo {
    pub fn new(branch: BranchName) -> Self {
        Self {
            branch,
            detected_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestrationState {
    /// Branch merges land on
    pub current_branch: BranchName,
    /// Branches not attempted yet, in processing order
    #[serde(default)]
    pub pending: VecDeque<BranchName>,
    #[serde(default)]
    pub conflict: Option<ConflictInfo>,
}

impl OrchestrationState {
    pub fn new(current_branch: BranchName, pending: impl IntoIterator<Item = BranchName>) -> Self {
        Self {
            current_branch,
            pending: pending.into_iter().collect(),
            conflict: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.conflict.is_some() {
            Phase::ConflictPaused
        } else if self.pending.is_empty() {
            Phase::Completed
        } else {
            Phase::Running
        }
    }

    pub fn conflict_branch(&self) -> Option<&BranchName> {
        self.conflict.as_ref().map(|c| &c.branch)
    }

    /// Branches still owed a merge: the paused branch first, then pending.
    ///
    /// This is exactly what the required-branch file holds between steps.
    pub fn outstanding(&self) -> Vec<BranchName> {
        self.conflict
            .iter()
            .map(|c| c.branch.clone())
            .chain(self.pending.iter().cloned())
            .collect()
    }
}
