//! Credential store abstraction
//!
//! This module provides the `CredentialStore` trait that the account flows and
//! the cart service are written against, plus `DatabaseProvider` for picking a
//! backend (in-memory or file-based SQLite via libsql).
//!
//! # Example
//!
//! ```rust,ignore
//! use satchel::db::DatabaseProvider;
//!
//! // Use in-memory database (default for development/testing)
//! let store = DatabaseProvider::Memory.create_store().await?;
//!
//! // Use file-based SQLite
//! let store = DatabaseProvider::SQLite { path: "data/satchel.db".into() }
//!     .create_store()
//!     .await?;
//! ```

use crate::types::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Database provider configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
}

impl DatabaseProvider {
    /// Picks a provider from a configured URL. `:memory:` and the empty
    /// string select the in-memory database.
    pub fn from_url(url: &str) -> Self {
        let url = url.trim();
        if url.is_empty() || url == ":memory:" {
            DatabaseProvider::Memory
        } else {
            DatabaseProvider::SQLite {
                path: url.to_string(),
            }
        }
    }

    /// Create a store from this provider configuration
    pub async fn create_store(&self) -> Result<Arc<dyn CredentialStore>> {
        match self {
            DatabaseProvider::Memory => {
                let store = super::sqlite::SqliteStore::new_memory().await?;
                Ok(Arc::new(store))
            }
            DatabaseProvider::SQLite { path } => {
                let store = super::sqlite::SqliteStore::new_local(path).await?;
                Ok(Arc::new(store))
            }
        }
    }
}

/// Account record as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    /// Serialized cart exactly as stored; `None` when the column is NULL.
    pub cart: Option<String>,
}

/// Persistence operations for account records.
///
/// Implementations must make `create_user` atomic: a duplicate username
/// returns `AppError::Duplicate` and leaves no partial row behind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new account with an empty cart, returning its id.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<i64>;

    /// Get an account by username
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Overwrite the serialized cart. Returns `false` if no such account.
    async fn update_cart(&self, username: &str, cart_json: &str) -> Result<bool>;
}
