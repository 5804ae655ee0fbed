use std::path::PathBuf;
use thiserror::Error;

/// Result of an apply that reached the write step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// New content is on disk and the proposal is marked accepted.
    Committed,
    /// Verification failed; the original bytes were restored.
    Reverted { reason: String },
}

/// Hard failures of a single apply call. The live file is unchanged in
/// every case except [`ApplyError::Restore`].
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("Target file not found: {}", .0.display())]
    TargetMissing(PathBuf),

    #[error("Target is outside the source root: {}", .0.display())]
    OutsideRoot(PathBuf),

    #[error("Failed to back up {}: {source}", .target.display())]
    Backup {
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to restore {} from {}: {source}", .target.display(), .backup.display())]
    Restore {
        target: PathBuf,
        /// Kept on disk for manual recovery.
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
