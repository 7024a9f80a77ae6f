//! Per-repository execution lock
//!
//! Every mutating command holds an exclusive `fs2` lock on
//! `.taskmerge/merge.lock` for its whole duration. The OS drops the lock
//! when the process dies, so there are no stale locks to clean up.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

use super::MergeError;
use crate::fs::StoreError;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct RepoLock {
    file: File,
    path: PathBuf,
}

impl RepoLock {
    /// Acquire the lock, waiting up to `timeout` for another holder.
    ///
    /// A zero timeout tries once and rejects immediately.
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self, MergeError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| StoreError::io(path, e))?;

        let start = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => break,
                Err(e) if is_contended(&e) => {
                    if start.elapsed() >= timeout {
                        return Err(MergeError::Busy {
                            path: path.to_path_buf(),
                        });
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(e) => return Err(StoreError::io(path, e).into()),
            }
        }

        let mut lock = Self {
            file,
            path: path.to_path_buf(),
        };
        lock.write_owner().map_err(|e| StoreError::io(path, e))?;
        debug!(path = %lock.path.display(), "repository lock acquired");
        Ok(lock)
    }

    fn write_owner(&mut self) -> io::Result<()> {
        self.file.set_len(0)?;
        writeln!(self.file, "pid={}", std::process::id())?;
        writeln!(self.file, "timestamp={}", chrono::Utc::now().to_rfc3339())?;
        self.file.sync_all()
    }

    pub fn release(self) -> Result<(), MergeError> {
        FileExt::unlock(&self.file).map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == fs2::lock_contended_error().kind()
        || err.kind() == io::ErrorKind::WouldBlock
}
