//! Catalog schema definition and idempotent initialization.
//!
//! # Invariants
//! - `initialize` never drops or rewrites existing rows.
//! - A database stamped with a newer `user_version` is rejected, not upgraded.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Schema version stamped into `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

/// Name of the single catalog table.
pub const BOOKS_TABLE: &str = "livros";

/// Columns every catalog connection must expose.
pub const BOOKS_COLUMNS: [&str; 5] = ["id", "titulo", "autor", "ano_publicacao", "preco"];

// AUTOINCREMENT keeps ids from being reused after the highest row is deleted.
const CREATE_BOOKS_SQL: &str = "CREATE TABLE IF NOT EXISTS livros (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    titulo TEXT NOT NULL,
    autor TEXT NOT NULL,
    ano_publicacao INTEGER NOT NULL,
    preco REAL NOT NULL
);";

/// Ensures the catalog schema exists. Safe to call any number of times.
pub fn initialize(conn: &Connection) -> DbResult<()> {
    let current = user_version(conn)?;
    if current > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            found: current,
            supported: SCHEMA_VERSION,
        });
    }

    conn.execute_batch(CREATE_BOOKS_SQL)?;
    if current != SCHEMA_VERSION {
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    }

    Ok(())
}

/// Reads the schema version stamped on this connection's database.
pub fn user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
