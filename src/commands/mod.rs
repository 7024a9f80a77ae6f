//! CLI commands
//!
//! Each command has a `run` that does the work and returns a report, and an
//! `execute` that opens the repository and renders the report.

pub mod abort;
pub mod check;
pub mod context;
pub mod display;
pub mod merge;
pub mod push;
pub mod resolve;
pub mod status;

pub use context::Session;

/// Process exit code when a run stops on a merge conflict
pub const EXIT_CONFLICT: u8 = 2;
