//! Per-file driver: read, rewrite, persist if changed.

use anyhow::{Context, Result};
use ipnet::Ipv4Net;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::fs_abstraction::FileSystem;
use crate::rewrite::rewrite_config;

/// Outcome of one run over a directory.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of `.conf` files examined.
    pub examined: usize,
    /// Number of files whose contents changed.
    pub updated: usize,
}

/// Rewrite every `.conf` file under `basedir`, one file at a time.
///
/// Each file is handled independently; the first I/O error aborts the run.
/// With `dry_run` set, changed files are counted and reported but nothing
/// is written.
pub fn run<F: FileSystem>(
    fs: &F,
    basedir: &Path,
    key: &str,
    exclusion: Ipv4Net,
    dry_run: bool,
) -> Result<RunSummary> {
    let files = fs
        .conf_files(basedir)
        .with_context(|| format!("Failed to list {}", basedir.display()))?;

    let mut summary = RunSummary::default();
    for path in files {
        summary.examined += 1;
        if process_file(fs, &path, key, exclusion, dry_run)? {
            summary.updated += 1;
            if dry_run {
                info!("{}: would update (dry-run)", path.display());
            } else {
                info!("{}: updated, backup at {}", path.display(), backup_path(&path).display());
            }
        } else {
            debug!("{}: unchanged", path.display());
        }
    }
    Ok(summary)
}

/// Rewrite one configuration file. Returns whether its contents changed.
///
/// The new text is computed fully in memory and compared to the original;
/// only a real difference triggers the backup-then-overwrite, so an
/// untouched file is never renamed or rewritten.
pub fn process_file<F: FileSystem>(
    fs: &F,
    path: &Path,
    key: &str,
    exclusion: Ipv4Net,
    dry_run: bool,
) -> Result<bool> {
    let original = fs
        .read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let updated = rewrite_config(&original, key, exclusion);
    if updated == original {
        return Ok(false);
    }

    if !dry_run {
        let backup = backup_path(path);
        fs.persist_with_backup(path, &backup, &updated)
            .with_context(|| format!("Failed to update {}", path.display()))?;
    }
    Ok(true)
}

/// Backup location for a config file: `wg0.conf` -> `wg0.conf~`.
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push("~");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_abstraction::MockFileSystem;

    fn excl(s: &str) -> Ipv4Net {
        s.parse().unwrap()
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("/etc/wireguard/wg0.conf")),
            Path::new("/etc/wireguard/wg0.conf~")
        );
    }

    #[test]
    fn test_process_file_unchanged_never_writes() {
        let mut fs = MockFileSystem::new();
        fs.expect_read_to_string()
            .returning(|_| Ok("AllowedIPs = 192.168.0.0/24\n".to_string()));
        // No expect_persist_with_backup: any persist call fails the test.

        let changed = process_file(
            &fs,
            Path::new("/etc/wireguard/wg0.conf"),
            "AllowedIPs",
            excl("10.0.0.0/25"),
            false,
        )
        .unwrap();
        assert!(!changed);
    }

    #[test]
    fn test_process_file_persists_with_backup() {
        let mut fs = MockFileSystem::new();
        fs.expect_read_to_string()
            .returning(|_| Ok("AllowedIPs = 10.0.0.0/24\n".to_string()));
        fs.expect_persist_with_backup()
            .withf(|path, backup, contents| {
                path == Path::new("/etc/wireguard/wg0.conf")
                    && backup == Path::new("/etc/wireguard/wg0.conf~")
                    && contents == "AllowedIPs = 10.0.0.128/25\n"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let changed = process_file(
            &fs,
            Path::new("/etc/wireguard/wg0.conf"),
            "AllowedIPs",
            excl("10.0.0.0/25"),
            false,
        )
        .unwrap();
        assert!(changed);
    }

    #[test]
    fn test_process_file_dry_run_skips_persist() {
        let mut fs = MockFileSystem::new();
        fs.expect_read_to_string()
            .returning(|_| Ok("AllowedIPs = 10.0.0.0/24\n".to_string()));

        let changed = process_file(
            &fs,
            Path::new("/etc/wireguard/wg0.conf"),
            "AllowedIPs",
            excl("10.0.0.0/25"),
            true,
        )
        .unwrap();
        assert!(changed);
    }

    #[test]
    fn test_process_file_read_error_has_context() {
        let mut fs = MockFileSystem::new();
        fs.expect_read_to_string().returning(|_| {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "access denied",
            ))
        });

        let err = process_file(
            &fs,
            Path::new("/etc/wireguard/wg0.conf"),
            "AllowedIPs",
            excl("10.0.0.0/25"),
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("wg0.conf"));
    }

    #[test]
    fn test_run_counts_examined_and_updated() {
        let mut fs = MockFileSystem::new();
        fs.expect_conf_files().returning(|_| {
            Ok(vec![
                PathBuf::from("/etc/wireguard/wg0.conf"),
                PathBuf::from("/etc/wireguard/wg1.conf"),
            ])
        });
        fs.expect_read_to_string()
            .withf(|p| p == Path::new("/etc/wireguard/wg0.conf"))
            .returning(|_| Ok("AllowedIPs = 10.0.0.0/24\n".to_string()));
        fs.expect_read_to_string()
            .withf(|p| p == Path::new("/etc/wireguard/wg1.conf"))
            .returning(|_| Ok("AllowedIPs = 192.168.0.0/24\n".to_string()));
        fs.expect_persist_with_backup()
            .times(1)
            .returning(|_, _, _| Ok(()));

        let summary = run(
            &fs,
            Path::new("/etc/wireguard"),
            "AllowedIPs",
            excl("10.0.0.0/25"),
            false,
        )
        .unwrap();
        assert_eq!(summary, RunSummary { examined: 2, updated: 1 });
    }

    #[test]
    fn test_run_empty_dir() {
        let mut fs = MockFileSystem::new();
        fs.expect_conf_files().returning(|_| Ok(Vec::new()));

        let summary = run(
            &fs,
            Path::new("/etc/wireguard"),
            "AllowedIPs",
            excl("10.0.0.0/25"),
            false,
        )
        .unwrap();
        assert_eq!(summary, RunSummary::default());
    }
}
