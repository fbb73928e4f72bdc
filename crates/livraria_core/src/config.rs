//! Filesystem layout and retention settings for one catalog installation.
//!
//! # Responsibility
//! - Resolve data, backup, export and log locations from one base directory.
//! - Carry the backup retention count into the components that need it.
//!
//! # Invariants
//! - Components receive a `LibraryConfig` value; no path state is global.
//! - `backup_retention` is at least 1.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_DIR: &str = "meu_sistema_livraria";
pub const DEFAULT_BACKUP_RETENTION: usize = 5;

pub const DB_FILE_NAME: &str = "livraria.db";
pub const EXPORT_FILE_NAME: &str = "livros_exportados.csv";
pub const IMPORT_FILE_NAME: &str = "livros_importados.csv";

pub const HOME_ENV: &str = "LIVRARIA_HOME";
pub const RETENTION_ENV: &str = "LIVRARIA_BACKUP_RETENTION";

/// Resolved locations and policy for a catalog installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub data_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Maximum number of backup artifacts kept after pruning.
    pub backup_retention: usize,
}

impl LibraryConfig {
    /// Lays out the standard `data/`, `backups/`, `exports/` and `logs/` tree.
    pub fn from_base_dir(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            data_dir: base.join("data"),
            backup_dir: base.join("backups"),
            export_dir: base.join("exports"),
            log_dir: base.join("logs"),
            backup_retention: DEFAULT_BACKUP_RETENTION,
        }
    }

    /// Reads `LIVRARIA_HOME` and `LIVRARIA_BACKUP_RETENTION`, falling back to defaults.
    ///
    /// An unparsable or zero retention value falls back to the default.
    pub fn from_env() -> Self {
        let base = std::env::var_os(HOME_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BASE_DIR));
        let retention = std::env::var(RETENTION_ENV)
            .ok()
            .and_then(|value| value.trim().parse::<usize>().ok());

        let config = Self::from_base_dir(base);
        match retention {
            Some(keep) => config.with_backup_retention(keep),
            None => config,
        }
    }

    /// Overrides the retention count. Zero is clamped to 1.
    pub fn with_backup_retention(mut self, keep: usize) -> Self {
        self.backup_retention = keep.max(1);
        self
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn export_csv_path(&self) -> PathBuf {
        self.export_dir.join(EXPORT_FILE_NAME)
    }

    pub fn import_csv_path(&self) -> PathBuf {
        self.export_dir.join(IMPORT_FILE_NAME)
    }

    /// Creates every configured directory that does not exist yet.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        for dir in [
            &self.data_dir,
            &self.backup_dir,
            &self.export_dir,
            &self.log_dir,
        ] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self::from_base_dir(DEFAULT_BASE_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::{LibraryConfig, DEFAULT_BACKUP_RETENTION};
    use std::path::Path;

    #[test]
    fn from_base_dir_lays_out_fixed_file_names() {
        let config = LibraryConfig::from_base_dir("/srv/livraria");
        assert_eq!(
            config.db_path(),
            Path::new("/srv/livraria/data/livraria.db")
        );
        assert_eq!(
            config.export_csv_path(),
            Path::new("/srv/livraria/exports/livros_exportados.csv")
        );
        assert_eq!(
            config.import_csv_path(),
            Path::new("/srv/livraria/exports/livros_importados.csv")
        );
        assert_eq!(config.backup_dir, Path::new("/srv/livraria/backups"));
        assert_eq!(config.backup_retention, DEFAULT_BACKUP_RETENTION);
    }

    #[test]
    fn zero_retention_is_clamped() {
        let config = LibraryConfig::from_base_dir("/tmp/x").with_backup_retention(0);
        assert_eq!(config.backup_retention, 1);
    }

    #[test]
    fn ensure_dirs_creates_missing_tree() {
        let dir = tempfile::tempdir().unwrap();
        let config = LibraryConfig::from_base_dir(dir.path().join("nested"));

        config.ensure_dirs().unwrap();
        config.ensure_dirs().unwrap();

        assert!(config.data_dir.is_dir());
        assert!(config.backup_dir.is_dir());
        assert!(config.export_dir.is_dir());
        assert!(config.log_dir.is_dir());
    }

    #[test]
    fn config_serializes_paths_and_retention() {
        let config = LibraryConfig::from_base_dir("/srv/livraria").with_backup_retention(3);

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["backup_dir"], "/srv/livraria/backups");
        assert_eq!(json["backup_retention"], 3);

        let decoded: LibraryConfig = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, config);
    }
}
