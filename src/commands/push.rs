//! Push the merged branch
//!
//! Refused while a run is paused on a conflict or still has pending branches.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use super::Session;
use crate::git::PushMode;
use crate::orchestrator::MergeError;

pub fn run(session: &Session) -> Result<PushMode> {
    if let Some(state) = session.load_state()? {
        if let Some(branch) = state.conflict_branch() {
            return Err(MergeError::ConflictOutstanding {
                branch: branch.clone(),
            }
            .into());
        }
        if !state.pending.is_empty() {
            return Err(MergeError::PendingBranches {
                count: state.pending.len(),
            }
            .into());
        }
    }

    Ok(session.repo.push()?)
}

pub fn execute(repo: &Path) -> Result<()> {
    let session = Session::open_locked(repo)?;
    println!("{} Pushing to '{}'...", "→".blue().bold(), session.repo.remote());

    match run(&session)? {
        PushMode::Plain => println!("{} Pushed all commits", "✓".green().bold()),
        PushMode::SetUpstream => println!(
            "{} Pushed and set upstream to '{}'",
            "✓".green().bold(),
            session.repo.remote()
        ),
    }
    Ok(())
}
