//! `.taskmerge/config.toml`
//!
//! Every field is optional; a missing file means all defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::models::DEFAULT_REMOTE;
use crate::WORK_DIR_NAME;

/// Commit message used by the finalizer when the operator gives none
pub const DEFAULT_RESOLVE_MESSAGE: &str = "Resolve merge conflict";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Remote whose branches are searched and pushed to
    pub remote: String,
    /// Line-delimited task ids, relative to the repository root
    pub task_ids_file: PathBuf,
    /// Line-delimited required branches, relative to the repository root
    pub required_branches_file: PathBuf,
    pub resolve_message: String,
    /// Kill git invocations that run longer than this; unset means no limit
    pub command_timeout_secs: Option<u64>,
    /// How long to wait for another taskmerge process to release the repository
    pub lock_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let work_dir = PathBuf::from(WORK_DIR_NAME);
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            task_ids_file: work_dir.join("task_ids.txt"),
            required_branches_file: work_dir.join("required_branches.txt"),
            resolve_message: DEFAULT_RESOLVE_MESSAGE.to_string(),
            command_timeout_secs: None,
            lock_timeout_secs: 0,
        }
    }
}

impl Config {
    /// Load `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_secs(self.lock_timeout_secs)
    }

    pub fn task_ids_path(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.task_ids_file)
    }

    pub fn required_branches_path(&self, repo_root: &Path) -> PathBuf {
        repo_root.join(&self.required_branches_file)
    }
}
