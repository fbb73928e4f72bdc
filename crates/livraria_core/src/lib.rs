//! Core catalog logic for the Livraria book inventory.
//! This crate is the single source of truth for catalog invariants.

pub mod backup;
pub mod config;
pub mod db;
pub mod interchange;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use backup::{BackupArtifact, BackupError, BackupManager, BackupWarning};
pub use config::LibraryConfig;
pub use interchange::{InterchangeError, EXPORT_HEADER};
pub use logging::{default_log_level, init_logging, level_from_env, logging_status, LoggingError};
pub use model::book::{validate_price, Book, BookId, BookValidationError, NewBook};
pub use repo::book_repo::{BookRepository, RepoError, RepoResult, SqliteBookRepository};
pub use service::catalog_service::{
    CatalogError, CatalogResult, CatalogService, ExportSummary, MutationOutcome,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
