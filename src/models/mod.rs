//! Data model shared by the resolver, the orchestrator and the CLI

pub mod branch;
pub mod outcome;
pub mod state;
pub mod task;

pub use branch::{BranchName, DEFAULT_REMOTE};
pub use outcome::{BranchOutcome, MergeOutcome, MergeSummary};
pub use state::{ConflictInfo, OrchestrationState, Phase};
pub use task::TaskId;
