use std::fs;
use std::path::{Path, PathBuf};

use super::{locked_read, locked_write, StoreError};
use crate::models::OrchestrationState;

/// TOML-serialized [`OrchestrationState`] of an unfinished run.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when no run is in flight
    pub fn load(&self) -> Result<Option<OrchestrationState>, StoreError> {
        let content = match locked_read(&self.path) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    pub fn save(&self, state: &OrchestrationState) -> Result<(), StoreError> {
        let content = toml::to_string(state)?;
        locked_write(&self.path, &content)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }
}
