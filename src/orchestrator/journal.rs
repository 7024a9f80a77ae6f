//! Persistence hook called after every state change

use std::path::PathBuf;

use crate::fs::{write_branch_list, StateFile, StoreError};
use crate::models::{OrchestrationState, Phase};

/// Persists orchestration state.
///
/// The orchestrator calls [`Journal::record`] after each branch, before it
/// moves on to the next one.
pub trait Journal {
    fn record(&self, state: &OrchestrationState) -> Result<(), StoreError>;
}

/// Keeps the required-branch file and the state file in step with the
/// in-memory state.
pub struct FileJournal {
    required_branches: PathBuf,
    state_file: StateFile,
}

impl FileJournal {
    pub fn new(required_branches: impl Into<PathBuf>, state_file: StateFile) -> Self {
        Self {
            required_branches: required_branches.into(),
            state_file,
        }
    }
}

impl Journal for FileJournal {
    fn record(&self, state: &OrchestrationState) -> Result<(), StoreError> {
        write_branch_list(&self.required_branches, &state.outstanding())?;
        if state.phase() == Phase::Completed {
            self.state_file.clear()
        } else {
            self.state_file.save(state)
        }
    }
}
