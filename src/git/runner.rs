//! Git command runner abstraction
//!
//! Every git invocation goes through a [`GitExecutor`] so the branch
//! adapter and the orchestrator can be driven by a scripted executor in
//! tests. [`GitCli`] is the process-backed implementation.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, trace};
use wait_timeout::ChildExt;

use super::GitError;

/// Timeout for collecting output from the child's pipes once it has exited
const OUTPUT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs git subcommands in one repository.
pub trait GitExecutor {
    /// Run `git <args>` and return its combined output.
    ///
    /// A non-zero exit becomes [`GitError::Command`] carrying the combined
    /// stdout and stderr.
    fn execute(&self, args: &[&str]) -> Result<String, GitError>;
}

impl<E: GitExecutor + ?Sized> GitExecutor for &E {
    fn execute(&self, args: &[&str]) -> Result<String, GitError> {
        (**self).execute(args)
    }
}

/// Process-backed executor rooted at a repository working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_root: PathBuf,
    timeout: Option<Duration>,
}

impl GitCli {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            timeout: None,
        }
    }

    /// Kill any invocation that runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn spawn(&self, args: &[&str], command: &str) -> Result<Child, GitError> {
        Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            // Conflict detection reads git's English diagnostics
            .env("LC_ALL", "C")
            .env("GIT_MERGE_AUTOEDIT", "no")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| GitError::Spawn {
                command: command.to_string(),
                source,
            })
    }
}

impl GitExecutor for GitCli {
    fn execute(&self, args: &[&str]) -> Result<String, GitError> {
        let command = format!("git {}", args.join(" "));
        debug!(%command, repo = %self.repo_root.display(), "running git");

        let mut child = self.spawn(args, &command)?;

        // Drain both pipes while waiting; a child blocked on a full pipe
        // would otherwise never exit.
        let stdout_rx = drain(child.stdout.take());
        let stderr_rx = drain(child.stderr.take());

        let status = match self.timeout {
            Some(timeout) => match child.wait_timeout(timeout) {
                Ok(Some(status)) => status,
                Ok(None) => {
                    child.kill().ok();
                    child.wait().ok();
                    return Err(GitError::Timeout { command, timeout });
                }
                Err(source) => return Err(GitError::Spawn { command, source }),
            },
            None => child
                .wait()
                .map_err(|source| GitError::Spawn {
                    command: command.clone(),
                    source,
                })?,
        };

        let stdout = collect(stdout_rx);
        let stderr = collect(stderr_rx);
        let output = combine(&stdout, &stderr);
        trace!(%command, code = ?status.code(), %output, "git finished");

        if status.success() {
            Ok(output)
        } else {
            Err(GitError::Command {
                command,
                exit_code: status.code(),
                output,
            })
        }
    }
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    match stream {
        Some(mut stream) => {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stream.read_to_end(&mut buf);
                let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
            });
        }
        None => {
            let _ = tx.send(String::new());
        }
    }
    rx
}

fn collect(rx: mpsc::Receiver<String>) -> String {
    rx.recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
        .unwrap_or_else(|_| "[output collection timed out]".to_string())
}

fn combine(stdout: &str, stderr: &str) -> String {
    let stdout = stdout.trim_end();
    let stderr = stderr.trim_end();
    match (stdout.is_empty(), stderr.is_empty()) {
        (_, true) => stdout.to_string(),
        (true, false) => stderr.to_string(),
        (false, false) => format!("{stdout}\n{stderr}"),
    }
}

/// Check that a `git` binary is on PATH.
pub fn check_git_available() -> anyhow::Result<PathBuf> {
    which::which("git").map_err(|_| anyhow::anyhow!("git not found on PATH; install git first"))
}
