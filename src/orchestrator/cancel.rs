use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation, honoured between branches only.
///
/// An interrupted `git merge` would leave a half-merged tree, so a request
/// that arrives mid-merge takes effect before the next branch starts.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Route Ctrl-C (and SIGTERM) to this flag.
    pub fn install_ctrlc_handler(&self) -> Result<()> {
        let flag = self.clone();
        ctrlc::set_handler(move || {
            if flag.is_cancelled() {
                // Second interrupt: the operator really wants out
                std::process::exit(130);
            }
            eprintln!("Interrupt received; stopping after the current branch (press again to exit now)");
            flag.cancel();
        })
        .context("Failed to install interrupt handler")
    }
}
