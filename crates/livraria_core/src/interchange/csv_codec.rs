//! CSV reader/writer over `csv` with the catalog column layout.

use super::{InterchangeError, InterchangeResult};
use crate::model::book::{Book, BookId, NewBook};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

/// Header row written on export.
pub const EXPORT_HEADER: [&str; 5] = ["ID", "Título", "Autor", "Ano de Publicação", "Preço"];

/// Number of fields every data record must carry.
pub const RECORD_COLUMNS: usize = EXPORT_HEADER.len();

#[derive(Serialize)]
struct ExportRecord<'a> {
    id: BookId,
    title: &'a str,
    author: &'a str,
    publication_year: i32,
    price: f64,
}

impl<'a> From<&'a Book> for ExportRecord<'a> {
    fn from(book: &'a Book) -> Self {
        Self {
            id: book.id,
            title: &book.title,
            author: &book.author,
            publication_year: book.publication_year,
            price: book.price,
        }
    }
}

/// Writes the header and one record per book.
pub fn write_books<W: Write>(writer: W, books: &[Book]) -> InterchangeResult<()> {
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(EXPORT_HEADER)?;
    for book in books {
        csv_writer.serialize(ExportRecord::from(book))?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Parses every data record after the header into a validated payload.
///
/// An empty input yields no books.
pub fn read_books<R: Read>(reader: R) -> InterchangeResult<Vec<NewBook>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut books = Vec::new();
    for record in csv_reader.records() {
        books.push(parse_record(&record?)?);
    }
    Ok(books)
}

/// Overwrites `path` with the exported catalog.
pub fn export_to_path(path: &Path, books: &[Book]) -> InterchangeResult<()> {
    let file = File::create(path).map_err(|source| InterchangeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut buffered = BufWriter::new(file);
    write_books(&mut buffered, books)?;
    buffered.flush().map_err(|source| InterchangeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and parses an import file.
pub fn read_import_file(path: &Path) -> InterchangeResult<Vec<NewBook>> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            InterchangeError::NotFound(path.to_path_buf())
        } else {
            InterchangeError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    read_books(BufReader::new(file))
}

fn parse_record(record: &StringRecord) -> InterchangeResult<NewBook> {
    let line = record.position().map_or(0, |position| position.line());
    if record.len() != RECORD_COLUMNS {
        return Err(InterchangeError::Format {
            line,
            message: format!(
                "expected {RECORD_COLUMNS} columns, found {}",
                record.len()
            ),
        });
    }

    NewBook::parse(&record[1], &record[2], &record[3], &record[4]).map_err(|err| {
        InterchangeError::Format {
            line,
            message: err.to_string(),
        }
    })
}
