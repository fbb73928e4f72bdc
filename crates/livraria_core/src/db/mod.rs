//! Access to the catalog database file (`livraria.db`).
//!
//! `open_db` is the only way core code obtains a connection: it sets the busy
//! timeout and runs `schema::initialize`, so the `livros` table exists before
//! any repository statement runs. Connections are opened per operation and
//! dropped before the operation returns.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open or prepare the catalog database.
#[derive(Debug)]
pub enum DbError {
    /// Engine-level failure (file unreadable, locked, corrupt, constraint).
    Sqlite(rusqlite::Error),
    /// The file was stamped by a newer build; it is left untouched.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "catalog database error: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "catalog database uses schema version {found}, this build supports up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
