use super::traits::{CredentialStore, User};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use libsql::{Builder, Connection, Database, Value};

/// libsql-backed credential store.
///
/// Holds a single connection for its whole life; an in-memory SQLite database
/// only exists as long as the connection that created it.
pub struct SqliteStore {
    _db: Database,
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a database file at `path`.
    pub async fn new_local(path: &str) -> Result<Self> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Database(format!("Failed to create database directory: {}", e))
                })?;
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        Self::from_database(db).await
    }

    /// Opens a fresh in-memory database.
    pub async fn new_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        Self::from_database(db).await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let store = Self { _db: db, conn };
        store.initialize_schema().await?;

        Ok(store)
    }

    pub fn connection(&self) -> Connection {
        self.conn.clone()
    }

    async fn initialize_schema(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    username TEXT UNIQUE NOT NULL,
                    password_hash TEXT NOT NULL,
                    cart TEXT DEFAULT '[]'
                )",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        Ok(())
    }

    /// Number of rows holding `username`. Always 0 or 1 while the unique
    /// constraint holds.
    pub async fn count_users_named(&self, username: &str) -> Result<i64> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM users WHERE username = ?", [username])
            .await
            .map_err(|e| AppError::Database(format!("Failed to count users: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => row
                .get::<i64>(0)
                .map_err(|e| AppError::Database(e.to_string())),
            None => Ok(0),
        }
    }
}

#[async_trait]
impl CredentialStore for SqliteStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<i64> {
        // Single statement so a duplicate never leaves a partial row.
        let mut rows = self
            .conn
            .query(
                "INSERT INTO users (username, password_hash) VALUES (?, ?)
                 ON CONFLICT(username) DO NOTHING
                 RETURNING id",
                (username, password_hash),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create user: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => row
                .get::<i64>(0)
                .map_err(|e| AppError::Database(e.to_string())),
            None => Err(AppError::Duplicate(format!(
                "username '{}' is already taken",
                username
            ))),
        }
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, username, password_hash, cart FROM users WHERE username = ?",
                [username],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            let cart = match row
                .get_value(3)
                .map_err(|e| AppError::Database(e.to_string()))?
            {
                Value::Text(text) => Some(text),
                Value::Blob(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
                _ => None,
            };

            Ok(Some(User {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                username: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
                password_hash: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
                cart,
            }))
        } else {
            Ok(None)
        }
    }

    async fn update_cart(&self, username: &str, cart_json: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE users SET cart = ? WHERE username = ?",
                (cart_json, username),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update cart: {}", e)))?;

        Ok(changed > 0)
    }
}
