//! Credential store.
//!
//! This module provides the persistence layer for account records:
//! - [`CredentialStore`] - the interface the rest of the crate depends on
//! - [`SqliteStore`] - libsql implementation (file-based or in-memory)
//!
//! Everything above this layer holds an `Arc<dyn CredentialStore>`, so tests
//! can swap in an in-memory database or a mock.

#![allow(missing_docs)]

pub mod sqlite;
pub mod traits;

// Re-exports
pub use sqlite::SqliteStore;
pub use traits::{CredentialStore, DatabaseProvider, User};

#[cfg(test)]
pub use traits::MockCredentialStore;
