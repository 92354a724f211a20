//! Recursive copy of verified save directories into the backup store.
//!
//! Each title is backed up to `<root>/<appid>`. The first source of an
//! appid in a run is copied into a staging directory and swapped in only
//! once the copy is complete; later sources of that appid are merged into
//! the fresh backup. A failed entry leaves the previous backup in place.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use savekeep_resolve::VerifiedEntry;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::BackupError;

/// Outcome of one backup run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackupReport {
    pub copied: usize,
    pub failed: usize,
}

/// Backs up every entry under `root`. A failing entry is logged and
/// counted; the rest still run.
pub fn backup_all(entries: &[VerifiedEntry], root: &Path) -> BackupReport {
    let mut replaced = HashSet::new();
    let mut report = BackupReport::default();

    for entry in entries {
        let src = Path::new(&entry.path);
        let dest = root.join(&entry.appid);
        let result = if replaced.contains(entry.appid.as_str()) {
            merge_into(src, &dest)
        } else {
            replace_with(src, root, &entry.appid)
        };

        match result {
            Ok(files) => {
                info!(appid = %entry.appid, source = %entry.path, files, "backed up");
                replaced.insert(entry.appid.as_str());
                report.copied += 1;
            }
            Err(e) => {
                warn!(appid = %entry.appid, source = %entry.path, error = %e, "backup failed");
                report.failed += 1;
            }
        }
    }

    info!(copied = report.copied, failed = report.failed, "backup finished");
    report
}

/// Staging directory for an appid's replacement backup.
fn staging_dir(root: &Path, appid: &str) -> PathBuf {
    root.join(format!(".{appid}.tmp"))
}

/// Copies `src` into a staging directory, then swaps it in for
/// `<root>/<appid>`.
fn replace_with(src: &Path, root: &Path, appid: &str) -> Result<usize, BackupError> {
    if !src.is_dir() {
        return Err(BackupError::NotADirectory(src.to_path_buf()));
    }

    let staging = staging_dir(root, appid);
    remove_dir_if_exists(&staging)?;
    fs::create_dir_all(&staging).map_err(BackupError::io(&staging))?;

    let files = match copy_tree(src, &staging) {
        Ok(files) => files,
        Err(e) => {
            let _ = fs::remove_dir_all(&staging);
            return Err(e);
        }
    };

    let dest = root.join(appid);
    remove_dir_if_exists(&dest)?;
    fs::rename(&staging, &dest).map_err(BackupError::io(&dest))?;
    Ok(files)
}

fn merge_into(src: &Path, dest: &Path) -> Result<usize, BackupError> {
    fs::create_dir_all(dest).map_err(BackupError::io(dest))?;
    copy_tree(src, dest)
}

fn remove_dir_if_exists(dir: &Path) -> Result<(), BackupError> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(BackupError::io(dir))?;
    }
    Ok(())
}

/// Copies the contents of `src` into `dest`, overwriting existing files.
/// Returns the number of files copied.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<usize, BackupError> {
    if !src.is_dir() {
        return Err(BackupError::NotADirectory(src.to_path_buf()));
    }

    let mut files = 0;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| BackupError::NotADirectory(entry.path().to_path_buf()))?;
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(BackupError::io(&target))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(BackupError::io(parent))?;
            }
            fs::copy(entry.path(), &target).map_err(BackupError::io(entry.path()))?;
            files += 1;
        }
    }
    Ok(files)
}
