//! Merge orchestration
//!
//! The orchestrator walks the pending branch list strictly in order against
//! one working tree, pausing on the first conflict. The finalizer commits
//! the operator's resolution and resumes the same state.
//!
//! Concurrency discipline:
//! - [`RepoLock`] keeps other taskmerge processes out of the repository
//! - [`CancelFlag`] is only consulted between branches

pub mod cancel;
pub mod events;
pub mod finalize;
pub mod journal;
pub mod lock;
pub mod merge;

use std::path::PathBuf;
use thiserror::Error;

use crate::fs::StoreError;
use crate::git::GitError;
use crate::models::BranchName;

pub use cancel::CancelFlag;
pub use events::{MergeEvent, NullSink, ProgressSink, TracingSink};
pub use journal::{FileJournal, Journal};
pub use lock::RepoLock;
pub use merge::{merge_message, Orchestrator};

/// A finalize or abort request that does not fit the current state.
///
/// Returned before anything is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionInconsistency {
    #[error("no merge conflict is outstanding")]
    NoConflict,

    #[error("no merge of '{branch}' is in progress; run `taskmerge abort` to requeue it")]
    NoMergeInProgress { branch: BranchName },

    #[error("nothing to commit for '{branch}'")]
    NothingToCommit { branch: BranchName },
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Inconsistent(#[from] ResolutionInconsistency),

    #[error("merge of '{branch}' is paused on conflicts; resolve or abort it first")]
    ConflictOutstanding { branch: BranchName },

    #[error("'{actual}' is checked out but the paused run merges into '{expected}'")]
    BranchChanged {
        expected: BranchName,
        actual: BranchName,
    },

    #[error("{count} branch(es) are still waiting to be merged")]
    PendingBranches { count: usize },

    #[error("another taskmerge operation holds {}", .path.display())]
    Busy { path: PathBuf },

    #[error(transparent)]
    Store(#[from] StoreError),
}
