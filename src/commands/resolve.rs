//! Commit a resolved conflict and continue merging
//!
//! Usage: taskmerge resolve [-m <message>] [--json]

use anyhow::Result;
use std::path::Path;
use std::process::ExitCode;

use super::display::ConsoleSink;
use super::merge::{render, MergeReport};
use super::Session;
use crate::orchestrator::{
    CancelFlag, MergeError, Orchestrator, ProgressSink, ResolutionInconsistency, TracingSink,
};

pub fn run(
    session: &Session,
    message: Option<&str>,
    sink: &dyn ProgressSink,
    cancel: Option<CancelFlag>,
) -> Result<MergeReport> {
    let Some(mut state) = session.load_state()? else {
        return Err(MergeError::from(ResolutionInconsistency::NoConflict).into());
    };
    let message = message.unwrap_or(&session.config.resolve_message);

    let journal = session.journal();
    let mut orchestrator = Orchestrator::new(&session.repo, &journal, sink);
    if let Some(cancel) = cancel {
        orchestrator = orchestrator.with_cancel(cancel);
    }

    let summary = orchestrator.finalize(&mut state, message)?;
    Ok(MergeReport::new(&state, summary))
}

pub fn execute(repo: &Path, message: Option<String>, json: bool) -> Result<ExitCode> {
    let session = Session::open_locked(repo)?;
    let cancel = CancelFlag::new();
    cancel.install_ctrlc_handler()?;

    let report = if json {
        run(&session, message.as_deref(), &TracingSink, Some(cancel))?
    } else {
        run(&session, message.as_deref(), &ConsoleSink, Some(cancel))?
    };
    render(&report, json)?;
    Ok(report.exit_code())
}
