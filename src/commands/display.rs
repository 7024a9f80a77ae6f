//! Console rendering shared by the commands

use colored::Colorize;
use serde::Serialize;

use crate::git::BranchLocation;
use crate::models::{MergeOutcome, MergeSummary};
use crate::orchestrator::{MergeEvent, ProgressSink};
use crate::resolve::TaskBranchMap;

/// Prints orchestration progress for an interactive operator.
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn on_event(&self, event: &MergeEvent<'_>) {
        match event {
            MergeEvent::RunStarted { current, pending } => {
                println!(
                    "{} Merging {pending} branch(es) into '{}'",
                    "→".blue().bold(),
                    current.to_string().cyan()
                );
            }
            MergeEvent::Processing { branch } => {
                println!("\n{} {}", "Processing".bold(), branch);
            }
            MergeEvent::Located { location, .. } => match location {
                BranchLocation::Local => println!("  found as a local branch"),
                BranchLocation::Remote => println!("  found as a remote branch"),
                BranchLocation::Missing => {}
            },
            MergeEvent::Outcome { branch, outcome } => match outcome {
                MergeOutcome::AlreadyMerged => {
                    println!("  {} already merged, skipping", "✓".green())
                }
                MergeOutcome::MergedNow => println!("  {} merged '{branch}'", "✓".green().bold()),
                MergeOutcome::NotFound => println!(
                    "  {} '{branch}' does not exist locally or remotely, skipping",
                    "⚠".yellow()
                ),
                MergeOutcome::Conflicted => {
                    println!("  {} merge conflict in '{branch}'", "✗".red().bold())
                }
            },
            MergeEvent::ConflictResolved { branch } => {
                println!("{} Conflicts resolved and '{branch}' committed", "✓".green().bold());
            }
            MergeEvent::Aborted { branch } => {
                println!("{} Merge of '{branch}' aborted", "■".yellow());
            }
            MergeEvent::Cancelled { remaining } => {
                println!(
                    "\n{} Interrupted; {remaining} branch(es) left for the next run",
                    "■".yellow()
                );
            }
        }
    }
}

pub fn print_summary(summary: &MergeSummary) {
    println!("\n{}", "Merge Summary".bold());
    let groups = [
        (MergeOutcome::AlreadyMerged, "Already merged".green()),
        (MergeOutcome::MergedNow, "Merged now".green().bold()),
        (MergeOutcome::NotFound, "Not found".yellow()),
        (MergeOutcome::Conflicted, "Conflicted".red().bold()),
    ];
    for (outcome, title) in groups {
        let branches = summary.with_outcome(outcome);
        if branches.is_empty() {
            continue;
        }
        println!("\n{title}:");
        for branch in branches {
            println!("  - {branch}");
        }
    }
    if summary.is_empty() {
        println!("  nothing to merge");
    }
}

pub fn print_task_map(task_map: &TaskBranchMap) {
    println!("\n{}", "Task IDs and associated branches".bold());
    for (task, branches) in task_map.iter() {
        if branches.is_empty() {
            println!("  {} {}", task.to_string().cyan(), "(no unmerged branches)".dimmed());
            continue;
        }
        println!("  {}", task.to_string().cyan());
        for branch in branches {
            println!("    - {branch}");
        }
    }
}

pub fn print_conflict_instructions(branch: &str) {
    println!();
    println!(
        "{} Merge of '{branch}' stopped on conflicts.",
        "!".red().bold()
    );
    println!("  1. Resolve the conflicting files in the working tree");
    println!("  2. Run {} to commit and continue", "taskmerge resolve".cyan());
    println!(
        "     or {} to abandon this branch for now",
        "taskmerge abort".cyan()
    );
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
