//! Abandon a merge paused on conflicts
//!
//! The branch goes back to the head of the required list, so the next
//! `taskmerge merge` tries it again.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use super::display::ConsoleSink;
use super::Session;
use crate::models::BranchName;
use crate::orchestrator::{MergeError, Orchestrator, ProgressSink, ResolutionInconsistency};

pub fn run(session: &Session, sink: &dyn ProgressSink) -> Result<BranchName> {
    let Some(mut state) = session.load_state()? else {
        return Err(MergeError::from(ResolutionInconsistency::NoConflict).into());
    };
    let journal = session.journal();
    let orchestrator = Orchestrator::new(&session.repo, &journal, sink);
    Ok(orchestrator.abort(&mut state)?)
}

pub fn execute(repo: &Path) -> Result<()> {
    let session = Session::open_locked(repo)?;
    let branch = run(&session, &ConsoleSink)?;
    println!(
        "  '{branch}' stays first in the required list; run {} to retry it",
        "taskmerge merge".cyan()
    );
    Ok(())
}
