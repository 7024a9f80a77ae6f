//! File locking utilities for safe concurrent access
//!
//! Locked read/write operations using `fs2` advisory locks, so a reader never
//! sees a half-written list while another taskmerge process updates it.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::StoreError;

/// Read file contents with a shared (read) lock.
pub fn locked_read(path: &Path) -> Result<String, StoreError> {
    let io_err = |source| StoreError::io(path, source);

    let file = File::open(path).map_err(io_err)?;
    file.lock_shared().map_err(io_err)?;
    let mut content = String::new();
    BufReader::new(&file)
        .read_to_string(&mut content)
        .map_err(io_err)?;
    Ok(content)
}

/// Write file contents with an exclusive (write) lock.
///
/// The sequence is: open → lock → truncate → write → flush, so the file is
/// never observed empty by a locked reader.
pub fn locked_write(path: &Path, content: &str) -> Result<(), StoreError> {
    let io_err = |source| StoreError::io(path, source);

    #[allow(clippy::suspicious_open_options)]
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .open(path)
        .map_err(io_err)?;
    file.lock_exclusive().map_err(io_err)?;
    file.set_len(0).map_err(io_err)?;
    let mut writer = BufWriter::new(&file);
    writer.write_all(content.as_bytes()).map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}
