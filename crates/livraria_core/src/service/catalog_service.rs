//! Catalog use-case service.
//!
//! # Responsibility
//! - Expose the catalog operations (add/list/update/delete/search/export/import).
//! - Open one connection per operation and release it before returning.
//! - Take a backup after every mutation, including zero-match ones.
//!
//! # Invariants
//! - Validation runs before any connection is opened.
//! - A committed mutation is never reported as failed because its backup failed;
//!   the failure travels as `MutationOutcome::backup` instead.
//! - Imports insert all rows in one transaction or none.

use crate::backup::{BackupError, BackupManager, BackupWarning};
use crate::config::LibraryConfig;
use crate::db::{open_db, DbError};
use crate::interchange::{export_to_path, read_import_file, InterchangeError};
use crate::model::book::{validate_price, Book, BookId, BookValidationError, NewBook};
use crate::repo::book_repo::{BookRepository, RepoError, RepoResult, SqliteBookRepository};
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum CatalogError {
    /// Caller-supplied field failed type or non-empty checks.
    Validation(BookValidationError),
    /// Engine I/O or constraint failure.
    Storage(RepoError),
    /// Id-keyed mutation matched no row.
    BookNotFound(BookId),
    /// Import source file is absent.
    FileNotFound(PathBuf),
    /// Malformed import record.
    Format { line: u64, message: String },
    /// Export/import file I/O failure.
    Interchange(InterchangeError),
    /// Directly requested backup failed.
    Backup(BackupError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid book: {err}"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            Self::Format { line, message } => {
                write!(f, "malformed import record at line {line}: {message}")
            }
            Self::Interchange(err) => write!(f, "{err}"),
            Self::Backup(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Interchange(err) => Some(err),
            Self::Backup(err) => Some(err),
            Self::BookNotFound(_) | Self::FileNotFound(_) | Self::Format { .. } => None,
        }
    }
}

impl From<BookValidationError> for CatalogError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::BookNotFound(id),
            other => Self::Storage(other),
        }
    }
}

impl From<DbError> for CatalogError {
    fn from(value: DbError) -> Self {
        Self::Storage(RepoError::Db(value))
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(RepoError::from(value))
    }
}

impl From<InterchangeError> for CatalogError {
    fn from(value: InterchangeError) -> Self {
        match value {
            InterchangeError::NotFound(path) => Self::FileNotFound(path),
            InterchangeError::Format { line, message } => Self::Format { line, message },
            other => Self::Interchange(other),
        }
    }
}

/// Result of a committed mutation plus the status of its follow-up backup.
#[derive(Debug)]
pub struct MutationOutcome<T> {
    pub value: T,
    pub backup: Result<PathBuf, BackupWarning>,
}

impl<T> MutationOutcome<T> {
    /// Path of the artifact written after the mutation, if the backup succeeded.
    pub fn backup_artifact(&self) -> Option<&Path> {
        self.backup.as_ref().ok().map(PathBuf::as_path)
    }

    /// Backup failure reported alongside a successful mutation.
    pub fn backup_warning(&self) -> Option<&BackupWarning> {
        self.backup.as_ref().err()
    }
}

/// Summary of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub rows: usize,
}

/// Catalog facade over one database file and its backup directory.
pub struct CatalogService {
    config: LibraryConfig,
    backups: BackupManager,
}

impl CatalogService {
    /// Creates a service for the installation described by `config`.
    ///
    /// Directories are not created here; see `LibraryConfig::ensure_dirs`.
    pub fn new(config: LibraryConfig) -> Self {
        let backups = BackupManager::from_config(&config);
        Self { config, backups }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Ensures the catalog schema exists. Idempotent.
    pub fn initialize(&self) -> CatalogResult<()> {
        drop(self.connect()?);
        info!("event=catalog_init module=service status=ok");
        Ok(())
    }

    /// Adds one book and returns its assigned id.
    pub fn add(&self, book: &NewBook) -> CatalogResult<MutationOutcome<BookId>> {
        book.validate()?;
        let id = self.with_repo(|repo| repo.insert_book(book))?;
        info!("event=book_add module=service status=ok book_id={id}");
        Ok(self.after_mutation("book_add", id))
    }

    /// Lists every book in insertion order.
    pub fn list_all(&self) -> CatalogResult<Vec<Book>> {
        self.with_repo(|repo| repo.list_books())
    }

    /// Loads one book by id.
    pub fn get(&self, id: BookId) -> CatalogResult<Option<Book>> {
        self.with_repo(|repo| repo.get_book(id))
    }

    pub fn count(&self) -> CatalogResult<usize> {
        self.with_repo(|repo| repo.count_books())
    }

    /// Sets the price of every book titled exactly `title`.
    ///
    /// Returns the number of rows changed; zero is a successful no-op.
    pub fn update_price(&self, title: &str, price: f64) -> CatalogResult<MutationOutcome<usize>> {
        validate_price(price)?;
        let changed = self.with_repo(|repo| repo.update_price_by_title(title, price))?;
        info!("event=book_update_price module=service status=ok key=title matched={changed}");
        Ok(self.after_mutation("book_update_price", changed))
    }

    /// Sets the price of exactly one book by id.
    pub fn update_price_by_id(
        &self,
        id: BookId,
        price: f64,
    ) -> CatalogResult<MutationOutcome<()>> {
        validate_price(price)?;
        self.with_repo(|repo| repo.update_price_by_id(id, price))?;
        info!("event=book_update_price module=service status=ok key=id book_id={id}");
        Ok(self.after_mutation("book_update_price", ()))
    }

    /// Deletes every book titled exactly `title`.
    ///
    /// Returns the number of rows removed; zero is a successful no-op.
    pub fn delete_by_title(&self, title: &str) -> CatalogResult<MutationOutcome<usize>> {
        let removed = self.with_repo(|repo| repo.delete_by_title(title))?;
        info!("event=book_delete module=service status=ok key=title removed={removed}");
        Ok(self.after_mutation("book_delete", removed))
    }

    /// Deletes exactly one book by id.
    pub fn delete_by_id(&self, id: BookId) -> CatalogResult<MutationOutcome<()>> {
        self.with_repo(|repo| repo.delete_by_id(id))?;
        info!("event=book_delete module=service status=ok key=id book_id={id}");
        Ok(self.after_mutation("book_delete", ()))
    }

    /// Titles of books whose author equals `author` exactly. Empty means none found.
    pub fn find_by_author(&self, author: &str) -> CatalogResult<Vec<String>> {
        self.with_repo(|repo| repo.find_titles_by_author(author))
    }

    /// Writes the whole catalog to `path`, replacing any existing file.
    pub fn export_csv(&self, path: &Path) -> CatalogResult<ExportSummary> {
        let books = self.list_all()?;
        export_to_path(path, &books)?;
        info!(
            "event=catalog_export module=service status=ok rows={}",
            books.len()
        );
        Ok(ExportSummary {
            path: path.to_path_buf(),
            rows: books.len(),
        })
    }

    /// Exports to the configured `livros_exportados.csv`.
    pub fn export_default(&self) -> CatalogResult<ExportSummary> {
        self.export_csv(&self.config.export_csv_path())
    }

    /// Inserts every record of the CSV file at `path` as a new book.
    ///
    /// The file is fully parsed before the first insert, and all inserts share
    /// one transaction. Returns the number of books inserted.
    pub fn import_csv(&self, path: &Path) -> CatalogResult<MutationOutcome<usize>> {
        let books = match read_import_file(path) {
            Ok(books) => books,
            Err(err) => {
                warn!("event=catalog_import module=service status=error error={err}");
                return Err(err.into());
            }
        };

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        {
            let repo = SqliteBookRepository::try_new(&tx)?;
            for book in &books {
                repo.insert_book(book)?;
            }
        }
        tx.commit()?;
        drop(conn);

        info!(
            "event=catalog_import module=service status=ok rows={}",
            books.len()
        );
        Ok(self.after_mutation("catalog_import", books.len()))
    }

    /// Imports the configured `livros_importados.csv`.
    pub fn import_default(&self) -> CatalogResult<MutationOutcome<usize>> {
        self.import_csv(&self.config.import_csv_path())
    }

    /// Takes a backup on demand. Unlike post-mutation backups, failure is an error.
    pub fn backup_now(&self) -> CatalogResult<PathBuf> {
        self.backups
            .snapshot_and_prune()
            .map_err(CatalogError::Backup)
    }

    fn connect(&self) -> CatalogResult<Connection> {
        Ok(open_db(self.config.db_path())?)
    }

    fn with_repo<T>(
        &self,
        op: impl FnOnce(&SqliteBookRepository<'_>) -> RepoResult<T>,
    ) -> CatalogResult<T> {
        let conn = self.connect()?;
        let repo = SqliteBookRepository::try_new(&conn)?;
        Ok(op(&repo)?)
    }

    fn after_mutation<T>(&self, event: &str, value: T) -> MutationOutcome<T> {
        let backup = self.backups.snapshot_and_prune().map_err(|err| {
            warn!(
                "event={event} module=service status=warning error_code=backup_failed error={err}"
            );
            BackupWarning::from(err)
        });
        MutationOutcome { value, backup }
    }
}
