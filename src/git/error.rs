use std::time::Duration;
use thiserror::Error;

/// Failures of a single git invocation.
#[derive(Debug, Error)]
pub enum GitError {
    /// git could not be started at all
    #[error("failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// git exited non-zero; `output` is the combined stdout and stderr
    #[error("`{command}` failed{}:\n{output}", .exit_code.map(|c| format!(" with exit code {c}")).unwrap_or_default())]
    Command {
        command: String,
        exit_code: Option<i32>,
        output: String,
    },

    /// `git merge` stopped on overlapping changes
    #[error("merge of '{source_ref}' stopped on conflicts:\n{output}")]
    MergeConflict { source_ref: String, output: String },

    /// The invocation exceeded the configured command timeout and was killed
    #[error("`{command}` timed out after {}s", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    /// HEAD does not point at a branch
    #[error("HEAD is detached; check out the branch to merge into first")]
    DetachedHead,
}

impl GitError {
    /// Exit code of a failed command, if the process ran to completion
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            GitError::Command { exit_code, .. } => *exit_code,
            _ => None,
        }
    }

    /// Diagnostic text captured from git, if any
    pub fn output(&self) -> Option<&str> {
        match self {
            GitError::Command { output, .. } | GitError::MergeConflict { output, .. } => {
                Some(output)
            }
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, GitError::MergeConflict { .. })
    }
}
