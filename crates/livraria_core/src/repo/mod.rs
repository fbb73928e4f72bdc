//! Repository layer for catalog persistence.
//!
//! # Responsibility
//! - Define the catalog store contract used by services.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Repository writes enforce `NewBook::validate()` before persistence.
//! - Title-keyed mutations report affected row counts; zero is not an error.

pub mod book_repo;
