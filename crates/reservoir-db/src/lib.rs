//! File persistence for the Reservoir resource economy.
//!
//! The economy only knows the [`KvStore`] trait. This crate provides the
//! durable implementation the host runs with: every value lives in one
//! JSON state file that is replaced atomically on each commit.
//!
//! # Modules
//!
//! - [`file_store`] -- [`JsonFileStore`], the JSON-file [`KvStore`]
//! - [`error`] -- Shared error types
//!
//! [`KvStore`]: reservoir_core::KvStore

pub mod error;
pub mod file_store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use file_store::{FORMAT_VERSION, JsonFileStore};
