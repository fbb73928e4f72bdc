//! CSV interchange for the whole catalog.
//!
//! # Responsibility
//! - Serialize catalog rows to the export layout with standard CSV quoting.
//! - Parse an import file into validated creation payloads.
//!
//! # Invariants
//! - The first import record is always treated as a header and skipped.
//! - Import parsing is all-or-nothing: one malformed record fails the file.
//! - The exported `ID` column is informational; imports ignore it.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

mod csv_codec;

pub use csv_codec::{
    export_to_path, read_books, read_import_file, write_books, EXPORT_HEADER, RECORD_COLUMNS,
};

pub type InterchangeResult<T> = Result<T, InterchangeError>;

#[derive(Debug)]
pub enum InterchangeError {
    /// Import source does not exist.
    NotFound(PathBuf),
    Io { path: PathBuf, source: io::Error },
    /// Record with wrong arity or unparsable field. `line` is 1-based.
    Format { line: u64, message: String },
    Csv(csv::Error),
}

impl Display for InterchangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "file not found: {}", path.display()),
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Format { line, message } => {
                write!(f, "malformed record at line {line}: {message}")
            }
            Self::Csv(err) => write!(f, "{err}"),
        }
    }
}

impl Error for InterchangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv(err) => Some(err),
            Self::NotFound(_) | Self::Format { .. } => None,
        }
    }
}

impl From<csv::Error> for InterchangeError {
    fn from(value: csv::Error) -> Self {
        if value.is_io_error() {
            return Self::Csv(value);
        }
        let line = value.position().map_or(0, |position| position.line());
        Self::Format {
            line,
            message: value.to_string(),
        }
    }
}
