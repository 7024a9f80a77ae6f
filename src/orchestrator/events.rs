//! Progress reporting seam between the orchestrator and its front end

use tracing::{info, warn};

use crate::git::BranchLocation;
use crate::models::{BranchName, MergeOutcome};

/// Something the orchestrator did or decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeEvent<'a> {
    RunStarted {
        current: &'a BranchName,
        pending: usize,
    },
    Processing {
        branch: &'a BranchName,
    },
    Located {
        branch: &'a BranchName,
        location: BranchLocation,
    },
    Outcome {
        branch: &'a BranchName,
        outcome: MergeOutcome,
    },
    ConflictResolved {
        branch: &'a BranchName,
    },
    Aborted {
        branch: &'a BranchName,
    },
    Cancelled {
        remaining: usize,
    },
}

/// Receives orchestration progress.
pub trait ProgressSink {
    fn on_event(&self, event: &MergeEvent<'_>);
}

/// Discards every event
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_event(&self, _event: &MergeEvent<'_>) {}
}

/// Forwards events to `tracing`
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn on_event(&self, event: &MergeEvent<'_>) {
        match event {
            MergeEvent::RunStarted { current, pending } => {
                info!(%current, pending, "merge run started")
            }
            MergeEvent::Processing { branch } => info!(%branch, "processing branch"),
            MergeEvent::Located { branch, location } => {
                info!(%branch, ?location, "branch located")
            }
            MergeEvent::Outcome { branch, outcome } => match outcome {
                MergeOutcome::NotFound | MergeOutcome::Conflicted => {
                    warn!(%branch, %outcome, "branch outcome")
                }
                _ => info!(%branch, %outcome, "branch outcome"),
            },
            MergeEvent::ConflictResolved { branch } => info!(%branch, "conflict resolved"),
            MergeEvent::Aborted { branch } => warn!(%branch, "paused merge aborted"),
            MergeEvent::Cancelled { remaining } => warn!(remaining, "merge run cancelled"),
        }
    }
}
