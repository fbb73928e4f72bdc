//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and lookup statements over the `livros` table.
//! - Map rows to `Book` values and engine failures to `RepoError`.
//!
//! # Invariants
//! - Title and author matching is exact and case-sensitive.
//! - List results follow insertion order (`id ASC`).
//! - Id-keyed mutations return `NotFound` when no row matches.

use crate::db::schema::{user_version, BOOKS_COLUMNS, BOOKS_TABLE, SCHEMA_VERSION};
use crate::db::DbError;
use crate::model::book::{validate_price, Book, BookId, BookValidationError, NewBook};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    titulo,
    autor,
    ano_publicacao,
    preco
FROM livros";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(BookValidationError),
    Db(DbError),
    NotFound(BookId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BookValidationError> for RepoError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the catalog store.
pub trait BookRepository {
    /// Inserts one validated book and returns the assigned id.
    fn insert_book(&self, book: &NewBook) -> RepoResult<BookId>;
    /// Loads one book by id.
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Lists every book in insertion order.
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    /// Counts catalog rows.
    fn count_books(&self) -> RepoResult<usize>;
    /// Sets `price` on every row whose title matches exactly. Returns rows changed.
    fn update_price_by_title(&self, title: &str, price: f64) -> RepoResult<usize>;
    /// Sets `price` on the row with the given id.
    fn update_price_by_id(&self, id: BookId, price: f64) -> RepoResult<()>;
    /// Deletes every row whose title matches exactly. Returns rows removed.
    fn delete_by_title(&self, title: &str) -> RepoResult<usize>;
    /// Deletes the row with the given id.
    fn delete_by_id(&self, id: BookId) -> RepoResult<()>;
    /// Returns titles whose author matches exactly, in insertion order.
    fn find_titles_by_author(&self, author: &str) -> RepoResult<Vec<String>>;
}

/// SQLite-backed catalog repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a connection with the catalog schema applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_catalog_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn insert_book(&self, book: &NewBook) -> RepoResult<BookId> {
        book.validate()?;

        self.conn.execute(
            "INSERT INTO livros (titulo, autor, ano_publicacao, preco)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                book.title.as_str(),
                book.author.as_str(),
                book.publication_year,
                book.price,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }

        Ok(None)
    }

    fn list_books(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();

        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }

        Ok(books)
    }

    fn count_books(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM livros;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {count}")))
    }

    fn update_price_by_title(&self, title: &str, price: f64) -> RepoResult<usize> {
        validate_price(price)?;
        let changed = self.conn.execute(
            "UPDATE livros
             SET preco = ?1
             WHERE titulo = ?2;",
            params![price, title],
        )?;
        Ok(changed)
    }

    fn update_price_by_id(&self, id: BookId, price: f64) -> RepoResult<()> {
        validate_price(price)?;
        let changed = self.conn.execute(
            "UPDATE livros
             SET preco = ?1
             WHERE id = ?2;",
            params![price, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_by_title(&self, title: &str) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM livros WHERE titulo = ?1;", [title])?;
        Ok(removed)
    }

    fn delete_by_id(&self, id: BookId) -> RepoResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM livros WHERE id = ?1;", [id])?;

        if removed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn find_titles_by_author(&self, author: &str) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT titulo
             FROM livros
             WHERE autor = ?1
             ORDER BY id ASC;",
        )?;
        let titles = stmt
            .query_map([author], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(titles)
    }
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let book = Book {
        id: row.get("id")?,
        title: row.get("titulo")?,
        author: row.get("autor")?,
        publication_year: row.get("ano_publicacao")?,
        price: row.get("preco")?,
    };

    if book.title.is_empty() || book.author.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "book {} has an empty title or author",
            book.id
        )));
    }

    Ok(book)
}

fn ensure_catalog_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = user_version(conn)?;
    if actual_version != SCHEMA_VERSION {
        return Err(RepoError::UninitializedConnection {
            expected_version: SCHEMA_VERSION,
            actual_version,
        });
    }

    if !table_exists(conn, BOOKS_TABLE)? {
        return Err(RepoError::MissingRequiredTable(BOOKS_TABLE));
    }

    for column in BOOKS_COLUMNS {
        if !table_has_column(conn, BOOKS_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: BOOKS_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
