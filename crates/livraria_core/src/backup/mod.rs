//! Timestamped snapshots of the catalog database with retention pruning.
//!
//! # Responsibility
//! - Copy the database file verbatim into the backup directory.
//! - Keep only the newest `retention` artifacts.
//!
//! # Invariants
//! - An artifact name is either absent or refers to a complete copy.
//! - Existing artifacts are never overwritten or modified.
//! - Pruning order is deterministic: modified time, then name timestamp,
//!   then sequence suffix, newest first.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

mod manager;

pub use manager::{artifact_file_name, parse_artifact_name, BackupArtifact, BackupManager};

pub type BackupResult<T> = Result<T, BackupError>;

/// Filesystem failure while snapshotting or pruning.
#[derive(Debug)]
pub enum BackupError {
    ReadSource { path: PathBuf, source: io::Error },
    WriteArtifact { path: PathBuf, source: io::Error },
    ListArtifacts { path: PathBuf, source: io::Error },
    RemoveArtifact { path: PathBuf, source: io::Error },
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadSource { path, source } => {
                write!(f, "failed to read database `{}`: {source}", path.display())
            }
            Self::WriteArtifact { path, source } => {
                write!(f, "failed to write backup `{}`: {source}", path.display())
            }
            Self::ListArtifacts { path, source } => write!(
                f,
                "failed to list backups in `{}`: {source}",
                path.display()
            ),
            Self::RemoveArtifact { path, source } => {
                write!(f, "failed to remove backup `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ReadSource { source, .. }
            | Self::WriteArtifact { source, .. }
            | Self::ListArtifacts { source, .. }
            | Self::RemoveArtifact { source, .. } => Some(source),
        }
    }
}

/// Non-fatal report of a backup that failed after a committed mutation.
#[derive(Debug)]
pub struct BackupWarning {
    pub error: BackupError,
}

impl Display for BackupWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "backup skipped: {}", self.error)
    }
}

impl From<BackupError> for BackupWarning {
    fn from(error: BackupError) -> Self {
        Self { error }
    }
}
