//! Git access for taskmerge
//!
//! This module provides:
//! - A command executor that runs git with combined output capture
//! - A branch repository adapter with the merge workflow's git operations

pub mod error;
pub mod repo;
pub mod runner;


pub use error::GitError;
pub use repo::{is_conflict_report, BranchLocation, BranchRepo, PushMode};
pub use runner::{check_git_available, GitCli, GitExecutor};
