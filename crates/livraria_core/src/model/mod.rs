//! Catalog domain model.
//!
//! # Responsibility
//! - Define the book record owned by the catalog store.
//! - Validate creation payloads before they reach storage.
//!
//! # Invariants
//! - Every stored book is identified by a store-assigned `BookId`.
//! - Deletion is physical; there is no tombstone state.

pub mod book;
