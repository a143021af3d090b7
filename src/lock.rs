//! Scoped advisory locking for configuration files.
//!
//! A rewritten file is replaced in two steps (rename to backup, write new
//! contents), so an exclusive flock is held across that window to keep a
//! second instance from interleaving. The lock is released when the guard
//! is dropped, on every exit path.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// A guard holding an exclusive lock on one configuration file.
#[derive(Debug)]
pub struct FileLock {
    _file: File,
}

impl FileLock {
    /// Attempt to acquire an exclusive, non-blocking lock on `path`.
    ///
    /// Fails with `WouldBlock` if another process already holds the lock.
    pub fn acquire(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;

        file.try_lock_exclusive().map_err(|_| {
            io::Error::new(
                io::ErrorKind::WouldBlock,
                format!("{} is locked by another process", path.display()),
            )
        })?;

        Ok(Self { _file: file })
    }
}

// Lock is released when the file handle is dropped.
