use super::error::ApplyError;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Sibling backup path: `HiveMind.ts` becomes `HiveMind.ts.bak`.
pub fn backup_path(target: &Path, suffix: &str) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    target.with_file_name(name)
}

/// Byte-exact copy of a file taken before it is overwritten.
///
/// Dropping the guard removes the backup. A guard dropped before
/// [`BackupGuard::commit`] or [`BackupGuard::restore`] (an early return or a
/// panic) restores the target first. A failed restore leaves the backup on
/// disk.
pub(crate) struct BackupGuard {
    target: PathBuf,
    backup: PathBuf,
    settled: bool,
    keep: bool,
}

impl BackupGuard {
    /// Refuses to overwrite an existing backup, which may be the only copy
    /// left by an earlier failed restore.
    pub fn create(target: &Path, suffix: &str) -> Result<Self, ApplyError> {
        let backup = backup_path(target, suffix);
        copy_new(target, &backup).map_err(|source| ApplyError::Backup {
            target: target.to_path_buf(),
            source,
        })?;
        debug!(target = %target.display(), backup = %backup.display(), "Backup created");

        Ok(Self {
            target: target.to_path_buf(),
            backup,
            settled: false,
            keep: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.backup
    }

    /// Keep the new content.
    pub fn commit(&mut self) {
        self.settled = true;
    }

    /// Put the original bytes back.
    pub fn restore(&mut self) -> Result<(), ApplyError> {
        self.settled = true;
        fs::copy(&self.backup, &self.target)
            .map(|_| ())
            .map_err(|source| {
                self.keep = true;
                ApplyError::Restore {
                    target: self.target.clone(),
                    backup: self.backup.clone(),
                    source,
                }
            })
    }
}

impl Drop for BackupGuard {
    fn drop(&mut self) {
        if !self.settled && let Err(e) = self.restore() {
            error!(error = %e, "Restore on unwind failed, backup kept");
        }
        if self.keep {
            return;
        }
        if let Err(e) = fs::remove_file(&self.backup)
            && e.kind() != io::ErrorKind::NotFound
        {
            error!(backup = %self.backup.display(), error = %e, "Could not remove backup");
        }
    }
}

fn copy_new(from: &Path, to: &Path) -> io::Result<()> {
    let mut source = File::open(from)?;
    let mut dest = File::options().write(true).create_new(true).open(to)?;
    if let Err(e) = io::copy(&mut source, &mut dest).and_then(|_| dest.sync_all()) {
        drop(dest);
        let _ = fs::remove_file(to);
        return Err(e);
    }
    Ok(())
}
