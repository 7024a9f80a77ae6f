//! Sequential merge of the pending branch list
//!
//! Per branch, in list order:
//! 1. Locate it: local ref, else remote-tracking ref, else `NotFound`
//! 2. Ancestor check of the located ref against the current branch
//!    (`AlreadyMerged`); re-evaluated for every branch because each merge
//!    advances the current branch
//! 3. Materialize a remote-only branch locally
//! 4. `git merge --no-ff`: `MergedNow`, or `Conflicted` and stop

use tracing::{debug, instrument};

use super::events::{MergeEvent, ProgressSink};
use super::journal::Journal;
use super::{CancelFlag, MergeError};
use crate::git::{BranchLocation, BranchRepo, GitError, GitExecutor};
use crate::models::{BranchName, ConflictInfo, MergeOutcome, MergeSummary, OrchestrationState};

/// Commit message for the merge of `branch` into `current`
pub fn merge_message(branch: &BranchName, current: &BranchName) -> String {
    format!("Merge branch '{branch}' into '{current}'")
}

pub struct Orchestrator<'a, E> {
    pub(super) repo: &'a BranchRepo<E>,
    pub(super) journal: &'a dyn Journal,
    pub(super) sink: &'a dyn ProgressSink,
    cancel: Option<CancelFlag>,
}

impl<'a, E: GitExecutor> Orchestrator<'a, E> {
    pub fn new(
        repo: &'a BranchRepo<E>,
        journal: &'a dyn Journal,
        sink: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            repo,
            journal,
            sink,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Begin a run over `pending` against the checked-out branch.
    pub fn start(
        &self,
        pending: Vec<BranchName>,
    ) -> Result<(OrchestrationState, MergeSummary), MergeError> {
        let current = self.repo.current_branch()?;
        let mut state = OrchestrationState::new(current, pending);
        let summary = self.run(&mut state)?;
        Ok((state, summary))
    }

    /// Process `state.pending` until it is empty, a conflict pauses the run,
    /// or cancellation is requested.
    ///
    /// On a command failure the failing branch stays at the head of
    /// `pending` and the error is returned, so the run can be retried.
    #[instrument(skip_all, fields(current = %state.current_branch))]
    pub fn run(&self, state: &mut OrchestrationState) -> Result<MergeSummary, MergeError> {
        if let Some(branch) = state.conflict_branch() {
            return Err(MergeError::ConflictOutstanding {
                branch: branch.clone(),
            });
        }

        self.sink.on_event(&MergeEvent::RunStarted {
            current: &state.current_branch,
            pending: state.pending.len(),
        });

        let mut summary = MergeSummary::new();
        while let Some(branch) = state.pending.front().cloned() {
            if self.is_cancelled() {
                summary.interrupted = true;
                self.sink.on_event(&MergeEvent::Cancelled {
                    remaining: state.pending.len(),
                });
                break;
            }

            let outcome = self.process(&branch, &state.current_branch)?;

            state.pending.pop_front();
            if outcome == MergeOutcome::Conflicted {
                state.conflict = Some(ConflictInfo::new(branch.clone()));
            }
            self.sink.on_event(&MergeEvent::Outcome {
                branch: &branch,
                outcome,
            });
            summary.record(branch, outcome);
            self.journal.record(state)?;

            if outcome == MergeOutcome::Conflicted {
                return Ok(summary);
            }
        }

        // Covers the empty-list run as well
        self.journal.record(state)?;
        Ok(summary)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }

    fn process(
        &self,
        branch: &BranchName,
        current: &BranchName,
    ) -> Result<MergeOutcome, MergeError> {
        self.sink.on_event(&MergeEvent::Processing { branch });

        let location = self.repo.locate(branch);
        self.sink.on_event(&MergeEvent::Located { branch, location });
        let source = match location {
            BranchLocation::Missing => return Ok(MergeOutcome::NotFound),
            BranchLocation::Local => branch.to_string(),
            BranchLocation::Remote => branch.remote_ref(self.repo.remote()),
        };

        if self.repo.is_ancestor(&source, current.as_str())? {
            return Ok(MergeOutcome::AlreadyMerged);
        }

        if location == BranchLocation::Remote {
            self.repo.fetch_branch(branch)?;
        }

        let message = merge_message(branch, current);
        match self.repo.merge_into(&source, current.as_str(), &message) {
            Ok(()) => Ok(MergeOutcome::MergedNow),
            Err(GitError::MergeConflict { output, .. }) => {
                debug!(%branch, %output, "merge stopped on conflicts");
                Ok(MergeOutcome::Conflicted)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Refuse to touch a paused run from a different checked-out branch
    pub(super) fn ensure_on_branch(&self, state: &OrchestrationState) -> Result<(), MergeError> {
        let actual = self.repo.current_branch()?;
        if actual != state.current_branch {
            return Err(MergeError::BranchChanged {
                expected: state.current_branch.clone(),
                actual,
            });
        }
        Ok(())
    }
}
