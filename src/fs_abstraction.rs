//! Filesystem abstraction layer for testability
//!
//! The rewrite core is pure over text; this trait is the seam between it
//! and the filesystem. The driver reads through it, and persists through
//! it only when a file actually changed, which makes "no write when
//! unchanged" directly assertable with a mock.

use std::io;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

use crate::lock::FileLock;

/// Trait abstracting the filesystem operations the driver needs.
#[cfg_attr(test, automock)]
pub trait FileSystem: Send + Sync {
    /// Read file contents as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// List the `.conf` files directly under `dir`, sorted by path.
    fn conf_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Replace `path` with `contents`, moving the previous version to
    /// `backup` first.
    fn persist_with_backup(&self, path: &Path, backup: &Path, contents: &str) -> io::Result<()>;
}

/// Real filesystem implementation using std::fs.
#[derive(Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn conf_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "conf") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn persist_with_backup(&self, path: &Path, backup: &Path, contents: &str) -> io::Result<()> {
        // Hold the lock across the rename+write window; released on drop
        // even if the write fails.
        let _lock = FileLock::acquire(path)?;
        std::fs::rename(path, backup)?;
        std::fs::write(path, contents)
    }
}

/// Global filesystem instance for production use.
static REAL_FS: RealFileSystem = RealFileSystem;

/// Get a reference to the global real filesystem instance.
pub fn real_fs() -> &'static RealFileSystem {
    &REAL_FS
}
