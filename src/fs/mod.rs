//! On-disk state: task and branch lists, the orchestration state file and
//! the `.taskmerge/` work directory.

pub mod lists;
pub mod locking;
pub mod state_file;
pub mod work_dir;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use lists::{read_required_branches, read_task_ids, write_branch_list};
pub use locking::{locked_read, locked_write};
pub use state_file::StateFile;
pub use work_dir::WorkDir;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid state file: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize state: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
