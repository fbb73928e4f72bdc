//! Snapshot and prune implementation.

use super::{BackupError, BackupResult};
use crate::config::LibraryConfig;
use chrono::{Local, NaiveDateTime, Timelike};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const ARTIFACT_PREFIX: &str = "backup_livraria_";
const ARTIFACT_EXTENSION: &str = "db";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

static ARTIFACT_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^backup_livraria_(\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2})(?:_(\d+))?\.db$")
        .expect("valid artifact name regex")
});

/// One existing backup file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupArtifact {
    pub path: PathBuf,
    pub file_name: String,
    pub modified: SystemTime,
    /// Wall-clock time encoded in the file name.
    pub timestamp: NaiveDateTime,
    /// Collision suffix; `0` when the name carries none.
    pub sequence: u32,
}

impl BackupArtifact {
    fn newest_first(&self, other: &Self) -> Ordering {
        other
            .modified
            .cmp(&self.modified)
            .then_with(|| other.timestamp.cmp(&self.timestamp))
            .then_with(|| other.sequence.cmp(&self.sequence))
            .then_with(|| other.file_name.cmp(&self.file_name))
    }
}

/// Builds the artifact file name for a snapshot time and collision sequence.
pub fn artifact_file_name(taken_at: NaiveDateTime, sequence: u32) -> String {
    let stamp = taken_at.format(TIMESTAMP_FORMAT);
    if sequence == 0 {
        format!("{ARTIFACT_PREFIX}{stamp}.{ARTIFACT_EXTENSION}")
    } else {
        format!("{ARTIFACT_PREFIX}{stamp}_{sequence}.{ARTIFACT_EXTENSION}")
    }
}

/// Parses an artifact file name into its timestamp and sequence.
///
/// Returns `None` for files that are not backup artifacts.
pub fn parse_artifact_name(file_name: &str) -> Option<(NaiveDateTime, u32)> {
    let captures = ARTIFACT_NAME_RE.captures(file_name)?;
    let timestamp = NaiveDateTime::parse_from_str(&captures[1], TIMESTAMP_FORMAT).ok()?;
    let sequence = match captures.get(2) {
        Some(value) => value.as_str().parse().ok()?,
        None => 0,
    };
    Some((timestamp, sequence))
}

/// Snapshots one database file into one backup directory.
#[derive(Debug, Clone)]
pub struct BackupManager {
    db_path: PathBuf,
    backup_dir: PathBuf,
    retention: usize,
}

impl BackupManager {
    pub fn new(
        db_path: impl Into<PathBuf>,
        backup_dir: impl Into<PathBuf>,
        retention: usize,
    ) -> Self {
        Self {
            db_path: db_path.into(),
            backup_dir: backup_dir.into(),
            retention: retention.max(1),
        }
    }

    pub fn from_config(config: &LibraryConfig) -> Self {
        Self::new(
            config.db_path(),
            config.backup_dir.clone(),
            config.backup_retention,
        )
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Copies the database file into a new artifact named after the current local time.
    pub fn snapshot(&self) -> BackupResult<PathBuf> {
        self.snapshot_at(Local::now().naive_local())
    }

    /// Copies the database file into a new artifact named after `taken_at`.
    ///
    /// The whole source is read before anything is written. Data lands in a
    /// hidden temporary file that is renamed into place only once complete.
    pub fn snapshot_at(&self, taken_at: NaiveDateTime) -> BackupResult<PathBuf> {
        let taken_at = taken_at.with_nanosecond(0).unwrap_or(taken_at);
        let bytes = fs::read(&self.db_path).map_err(|source| BackupError::ReadSource {
            path: self.db_path.clone(),
            source,
        })?;

        let target = self.next_artifact_path(taken_at)?;
        let file_name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let staging = self.backup_dir.join(format!(".{file_name}.tmp"));

        if let Err(source) = write_synced(&staging, &bytes) {
            let _ = fs::remove_file(&staging);
            return Err(BackupError::WriteArtifact {
                path: target,
                source,
            });
        }

        if let Err(source) = fs::rename(&staging, &target) {
            let _ = fs::remove_file(&staging);
            return Err(BackupError::WriteArtifact {
                path: target,
                source,
            });
        }

        info!(
            "event=backup_snapshot module=backup status=ok bytes={} artifact={}",
            bytes.len(),
            target.display()
        );
        Ok(target)
    }

    /// Lists backup artifacts, newest first.
    ///
    /// Files in the backup directory that do not follow the artifact naming
    /// pattern are ignored.
    pub fn list_artifacts(&self) -> BackupResult<Vec<BackupArtifact>> {
        let list_error = |source: std::io::Error| BackupError::ListArtifacts {
            path: self.backup_dir.clone(),
            source,
        };

        let mut artifacts = Vec::new();
        for entry in fs::read_dir(&self.backup_dir).map_err(list_error)? {
            let entry = entry.map_err(list_error)?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let Some((timestamp, sequence)) = parse_artifact_name(&file_name) else {
                continue;
            };

            let metadata = entry.metadata().map_err(list_error)?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified().map_err(list_error)?;

            artifacts.push(BackupArtifact {
                path: entry.path(),
                file_name,
                modified,
                timestamp,
                sequence,
            });
        }

        artifacts.sort_by(BackupArtifact::newest_first);
        Ok(artifacts)
    }

    /// Deletes every artifact beyond the newest `keep`. Returns removed paths.
    pub fn prune(&self, keep: usize) -> BackupResult<Vec<PathBuf>> {
        let artifacts = self.list_artifacts()?;
        let mut removed = Vec::new();

        for artifact in artifacts.into_iter().skip(keep) {
            fs::remove_file(&artifact.path).map_err(|source| BackupError::RemoveArtifact {
                path: artifact.path.clone(),
                source,
            })?;
            info!(
                "event=backup_prune module=backup status=ok artifact={}",
                artifact.path.display()
            );
            removed.push(artifact.path);
        }

        Ok(removed)
    }

    /// Snapshot followed by pruning to the configured retention.
    pub fn snapshot_and_prune(&self) -> BackupResult<PathBuf> {
        let artifact = self.snapshot()?;
        self.prune(self.retention)?;
        Ok(artifact)
    }

    // Sequences only grow within one timestamp: a pruned name is never handed out again.
    fn next_artifact_path(&self, taken_at: NaiveDateTime) -> BackupResult<PathBuf> {
        let sequence = self
            .list_artifacts()?
            .into_iter()
            .filter(|artifact| artifact.timestamp == taken_at)
            .map(|artifact| artifact.sequence + 1)
            .max()
            .unwrap_or(0);
        Ok(self
            .backup_dir
            .join(artifact_file_name(taken_at, sequence)))
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
