//! Show where the merge workflow stands

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use super::display::print_json;
use super::Session;
use crate::fs::read_required_branches;
use crate::models::{BranchName, Phase};

#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// `None` when HEAD is detached
    pub current_branch: Option<BranchName>,
    /// `None` when no run is in flight
    pub phase: Option<Phase>,
    pub conflict: Option<BranchName>,
    pub required: Vec<BranchName>,
    pub merge_in_progress: bool,
}

/// Read-only; does not take the repository lock.
pub fn run(session: &Session) -> Result<StatusReport> {
    let state = session.load_state()?;
    Ok(StatusReport {
        current_branch: session.repo.current_branch().ok(),
        phase: state.as_ref().map(|s| s.phase()),
        conflict: state.as_ref().and_then(|s| s.conflict_branch().cloned()),
        required: read_required_branches(&session.required_branches_path())?,
        merge_in_progress: session.repo.merge_in_progress(),
    })
}

pub fn execute(repo: &Path, json: bool) -> Result<()> {
    let session = Session::open(repo)?;
    let report = run(&session)?;
    if json {
        return print_json(&report);
    }

    let current = report
        .current_branch
        .as_ref()
        .map(|b| b.to_string())
        .unwrap_or_else(|| "(detached HEAD)".to_string());
    println!("{} {}", "Current branch:".bold(), current.cyan());

    let phase = match report.phase {
        Some(Phase::ConflictPaused) => "paused on conflict".red().bold(),
        Some(Phase::Running) => "unfinished run".yellow(),
        Some(Phase::Completed) | None => "idle".green(),
    };
    println!("{} {phase}", "State:".bold());

    if let Some(branch) = &report.conflict {
        println!("{} {branch}", "Conflict:".bold());
        if !report.merge_in_progress {
            println!(
                "  {} no merge in progress; run `taskmerge abort` to requeue the branch",
                "⚠".yellow()
            );
        }
    }

    if report.required.is_empty() {
        println!("{} none", "Required branches:".bold());
    } else {
        println!("{}", "Required branches:".bold());
        for branch in &report.required {
            println!("  - {branch}");
        }
    }
    Ok(())
}
