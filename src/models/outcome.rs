//! Per-branch merge outcomes and the summary reported to the operator

use serde::{Deserialize, Serialize};
use std::fmt;

use super::BranchName;

/// What happened to one branch during an orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeOutcome {
    /// Branch history was already contained in the current branch
    AlreadyMerged,
    /// A merge commit was created for the branch
    MergedNow,
    /// Branch exists neither locally nor as a remote-tracking ref
    NotFound,
    /// Merge stopped on conflicts; the working tree is left mid-merge
    Conflicted,
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeOutcome::AlreadyMerged => write!(f, "already merged"),
            MergeOutcome::MergedNow => write!(f, "merged now"),
            MergeOutcome::NotFound => write!(f, "not found"),
            MergeOutcome::Conflicted => write!(f, "conflicted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchOutcome {
    pub branch: BranchName,
    pub outcome: MergeOutcome,
}

/// Outcomes of one run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSummary {
    pub outcomes: Vec<BranchOutcome>,
    /// Set when the run stopped early on a cancellation request
    #[serde(default)]
    pub interrupted: bool,
}

impl MergeSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, branch: BranchName, outcome: MergeOutcome) {
        self.outcomes.push(BranchOutcome { branch, outcome });
    }

    /// Append the outcomes of a follow-up run (e.g. the resume after a
    /// conflict was resolved).
    pub fn extend(&mut self, other: MergeSummary) {
        self.outcomes.extend(other.outcomes);
        self.interrupted |= other.interrupted;
    }

    /// Branches with the given outcome, in processing order.
    pub fn with_outcome(&self, outcome: MergeOutcome) -> Vec<&BranchName> {
        self.outcomes
            .iter()
            .filter(|o| o.outcome == outcome)
            .map(|o| &o.branch)
            .collect()
    }

    pub fn count(&self, outcome: MergeOutcome) -> usize {
        self.outcomes.iter().filter(|o| o.outcome == outcome).count()
    }

    /// The branch the run paused on, if any
    pub fn conflicted(&self) -> Option<&BranchName> {
        self.outcomes
            .iter()
            .find(|o| o.outcome == MergeOutcome::Conflicted)
            .map(|o| &o.branch)
    }

    /// True when every processed branch ended up in the current branch
    pub fn is_clean(&self) -> bool {
        !self.interrupted
            && self.outcomes.iter().all(|o| {
                matches!(
                    o.outcome,
                    MergeOutcome::AlreadyMerged | MergeOutcome::MergedNow
                )
            })
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
