//! Book record and creation payload.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused after deletion.
//! - `title` and `author` are non-empty; `price` is finite.
//! - `(title, author)` is not unique; duplicates are allowed.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier of a catalog row.
pub type BookId = i64;

/// One persisted catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    /// Unit currency value.
    pub price: f64,
}

/// Creation payload for a book. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub price: f64,
}

/// Validation error for caller-supplied book fields.
#[derive(Debug, Clone, PartialEq)]
pub enum BookValidationError {
    EmptyTitle,
    EmptyAuthor,
    InvalidYear(String),
    InvalidPrice(String),
    NonFinitePrice(f64),
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::EmptyAuthor => write!(f, "author cannot be empty"),
            Self::InvalidYear(value) => {
                write!(f, "publication year `{value}` is not an integer")
            }
            Self::InvalidPrice(value) => write!(f, "price `{value}` is not a number"),
            Self::NonFinitePrice(value) => write!(f, "price must be finite, got {value}"),
        }
    }
}

impl Error for BookValidationError {}

/// Rejects `NaN` and infinite prices.
pub fn validate_price(price: f64) -> Result<(), BookValidationError> {
    if price.is_finite() {
        Ok(())
    } else {
        Err(BookValidationError::NonFinitePrice(price))
    }
}

impl NewBook {
    /// Builds a creation payload from already-typed fields.
    ///
    /// Does not validate; repository writes call `validate()`.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: i32,
        price: f64,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            publication_year,
            price,
        }
    }

    /// Parses textual input (prompt answers, CSV cells) into a validated payload.
    ///
    /// Surrounding whitespace is ignored for the numeric fields.
    pub fn parse(
        title: &str,
        author: &str,
        year_text: &str,
        price_text: &str,
    ) -> Result<Self, BookValidationError> {
        let publication_year = year_text
            .trim()
            .parse::<i32>()
            .map_err(|_| BookValidationError::InvalidYear(year_text.to_string()))?;
        let price = price_text
            .trim()
            .parse::<f64>()
            .map_err(|_| BookValidationError::InvalidPrice(price_text.to_string()))?;

        let book = Self::new(title, author, publication_year, price);
        book.validate()?;
        Ok(book)
    }

    /// Checks required-field constraints.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.title.trim().is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }
        if self.author.trim().is_empty() {
            return Err(BookValidationError::EmptyAuthor);
        }
        validate_price(self.price)
    }
}

impl Book {
    /// Drops the identity, keeping the catalog fields.
    pub fn to_new_book(&self) -> NewBook {
        NewBook::new(
            self.title.clone(),
            self.author.clone(),
            self.publication_year,
            self.price,
        )
    }
}
