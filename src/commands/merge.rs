//! Merge the required branches into the checked-out branch
//!
//! Usage: taskmerge merge [--json]

use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use super::display::{print_conflict_instructions, print_json, print_summary, ConsoleSink};
use super::{Session, EXIT_CONFLICT};
use crate::fs::read_required_branches;
use crate::models::{BranchName, MergeSummary, OrchestrationState, Phase};
use crate::orchestrator::{CancelFlag, MergeError, Orchestrator, ProgressSink};

/// Where a merge, resolve or abort left the run
#[derive(Debug, Serialize)]
pub struct MergeReport {
    pub phase: Phase,
    pub current_branch: BranchName,
    pub conflict: Option<BranchName>,
    pub pending: Vec<BranchName>,
    pub summary: MergeSummary,
}

impl MergeReport {
    pub fn new(state: &OrchestrationState, summary: MergeSummary) -> Self {
        Self {
            phase: state.phase(),
            current_branch: state.current_branch.clone(),
            conflict: state.conflict_branch().cloned(),
            pending: state.pending.iter().cloned().collect(),
            summary,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self.phase {
            Phase::ConflictPaused => ExitCode::from(EXIT_CONFLICT),
            _ => ExitCode::SUCCESS,
        }
    }
}

pub fn run(
    session: &Session,
    sink: &dyn ProgressSink,
    cancel: Option<CancelFlag>,
) -> Result<MergeReport> {
    if let Some(state) = session.load_state()? {
        if let Some(branch) = state.conflict_branch() {
            return Err(MergeError::ConflictOutstanding {
                branch: branch.clone(),
            }
            .into());
        }
    }

    let pending = read_required_branches(&session.required_branches_path())?;
    let journal = session.journal();
    let mut orchestrator = Orchestrator::new(&session.repo, &journal, sink);
    if let Some(cancel) = cancel {
        orchestrator = orchestrator.with_cancel(cancel);
    }

    let (state, summary) = orchestrator.start(pending)?;
    Ok(MergeReport::new(&state, summary))
}

pub fn execute(repo: &Path, json: bool) -> Result<ExitCode> {
    let session = Session::open_locked(repo)?;
    let cancel = CancelFlag::new();
    cancel.install_ctrlc_handler()?;

    let report = if json {
        run(&session, &crate::orchestrator::TracingSink, Some(cancel))?
    } else {
        run(&session, &ConsoleSink, Some(cancel))?
    };
    render(&report, json)?;
    Ok(report.exit_code())
}

/// Shared by `merge` and `resolve`
pub(super) fn render(report: &MergeReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }

    print_summary(&report.summary);
    match report.phase {
        Phase::ConflictPaused => {
            if let Some(branch) = &report.conflict {
                print_conflict_instructions(branch.as_str());
            }
        }
        Phase::Running => {
            println!(
                "\n{} branch(es) still pending; run `taskmerge merge` to continue.",
                report.pending.len()
            );
        }
        Phase::Completed => {
            if report.summary.is_clean() {
                println!("\nAll required branches are merged. Push with `taskmerge push` when ready.");
            } else {
                println!("\nSome branches could not be merged; see the summary above.");
            }
        }
    }
    Ok(())
}
