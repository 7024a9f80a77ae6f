//! Conflict resolution finalizer and abort

use tracing::info;

use super::events::MergeEvent;
use super::{MergeError, Orchestrator, ResolutionInconsistency};
use crate::git::GitExecutor;
use crate::models::{BranchName, MergeOutcome, MergeSummary, OrchestrationState};

fn is_nothing_to_commit(output: &str) -> bool {
    output.contains("nothing to commit") || output.contains("no changes added to commit")
}

impl<E: GitExecutor> Orchestrator<'_, E> {
    /// Commit the operator's resolution of the paused branch and resume the
    /// run over the remaining branches.
    ///
    /// Requires the paused merge to still be in progress. If staging or
    /// committing fails the state stays paused and the error is returned;
    /// the call can be repeated after further edits.
    pub fn finalize(
        &self,
        state: &mut OrchestrationState,
        message: &str,
    ) -> Result<MergeSummary, MergeError> {
        let branch = state
            .conflict_branch()
            .cloned()
            .ok_or(ResolutionInconsistency::NoConflict)?;
        self.ensure_on_branch(state)?;
        // Committing without MERGE_HEAD would record unrelated edits as the merge
        if !self.repo.merge_in_progress() {
            return Err(ResolutionInconsistency::NoMergeInProgress { branch }.into());
        }

        self.repo.stage_all()?;
        if let Err(e) = self.repo.commit(message) {
            if e.output().is_some_and(is_nothing_to_commit) {
                return Err(ResolutionInconsistency::NothingToCommit { branch }.into());
            }
            return Err(e.into());
        }

        info!(%branch, "conflict resolution committed");
        state.conflict = None;
        self.sink.on_event(&MergeEvent::ConflictResolved { branch: &branch });
        self.sink.on_event(&MergeEvent::Outcome {
            branch: &branch,
            outcome: MergeOutcome::MergedNow,
        });
        let mut summary = MergeSummary::new();
        summary.record(branch, MergeOutcome::MergedNow);
        self.journal.record(state)?;

        summary.extend(self.run(state)?);
        Ok(summary)
    }

    /// Abandon the paused merge and put its branch back at the head of the
    /// pending list, so the next run retries it.
    pub fn abort(&self, state: &mut OrchestrationState) -> Result<BranchName, MergeError> {
        let branch = state
            .conflict_branch()
            .cloned()
            .ok_or(ResolutionInconsistency::NoConflict)?;
        self.ensure_on_branch(state)?;

        // The operator may already have run `git merge --abort` by hand
        if self.repo.merge_in_progress() {
            self.repo.abort_merge()?;
        }

        state.conflict = None;
        state.pending.push_front(branch.clone());
        self.journal.record(state)?;
        self.sink.on_event(&MergeEvent::Aborted { branch: &branch });
        Ok(branch)
    }
}
