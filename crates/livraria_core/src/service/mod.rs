//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, backup and interchange calls into catalog operations.
//! - Keep callers decoupled from connection handling and storage details.

pub mod catalog_service;
