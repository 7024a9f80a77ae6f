//! Resolve task ids to the branches that still need merging
//!
//! Usage: taskmerge check [--task-ids <path>] [--no-fetch] [--json]

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::display::{print_json, print_task_map};
use super::Session;
use crate::fs::{read_task_ids, write_branch_list};
use crate::models::TaskId;
use crate::orchestrator::MergeError;
use crate::resolve::{resolve, Resolution};

#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Overrides the configured task id file
    pub task_ids: Option<PathBuf>,
    /// Run `git fetch --all` before listing remote branches
    pub fetch: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            task_ids: None,
            fetch: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub task_ids: Vec<TaskId>,
    #[serde(flatten)]
    pub resolution: Resolution,
    pub required_branches_file: PathBuf,
}

/// Compute and persist the required-branch list.
///
/// Refuses while a conflict is outstanding, since rewriting the list would
/// lose track of the paused branch.
pub fn run(session: &Session, options: &CheckOptions) -> Result<CheckReport> {
    if let Some(state) = session.load_state()? {
        if let Some(branch) = state.conflict_branch() {
            return Err(MergeError::ConflictOutstanding {
                branch: branch.clone(),
            }
            .into());
        }
    }

    let task_ids_path = match &options.task_ids {
        Some(path) => path.clone(),
        None => session.config.task_ids_path(session.repo_root()),
    };
    let task_ids = load_task_ids(&task_ids_path)?;

    if options.fetch {
        session.repo.fetch_all()?;
    }
    let remote_branches = session.repo.list_remote_branches()?;
    // One snapshot for the whole resolution
    let merged_branches = session.repo.list_merged_branches()?;

    let resolution = resolve(
        &task_ids,
        &remote_branches,
        &merged_branches,
        session.repo.remote(),
    );

    let required_branches_file = session.required_branches_path();
    write_branch_list(&required_branches_file, &resolution.required)
        .context("Failed to write required branches")?;
    // A fresh list supersedes whatever an interrupted run left behind
    session.state_file().clear()?;

    Ok(CheckReport {
        task_ids,
        resolution,
        required_branches_file,
    })
}

fn load_task_ids(path: &Path) -> Result<Vec<TaskId>> {
    if !path.exists() {
        bail!(
            "Task id file not found: {}\nExtract the task ids first (one per line).",
            path.display()
        );
    }
    let task_ids = read_task_ids(path)?;
    if task_ids.is_empty() {
        bail!("No task ids in {}", path.display());
    }
    Ok(task_ids)
}

pub fn execute(repo: &Path, options: CheckOptions, json: bool) -> Result<()> {
    let session = Session::open_locked(repo)?;
    if !json {
        println!(
            "{} Checking branches for task ids{}",
            "→".blue().bold(),
            if options.fetch { " (fetching remotes)" } else { "" }
        );
    }

    let report = run(&session, &options)?;
    if json {
        return print_json(&report);
    }

    print_task_map(&report.resolution.task_map);
    println!(
        "\n{} Found {} required branch(es), written to {}",
        "✓".green().bold(),
        report.resolution.required.len(),
        report.required_branches_file.display()
    );
    if !report.resolution.required.is_empty() {
        println!("  Run {} to merge them", "taskmerge merge".cyan());
    }
    Ok(())
}
