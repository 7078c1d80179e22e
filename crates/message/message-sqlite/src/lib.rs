//! # SQLite Message Store
//!
//! This crate provides an SQLite-based implementation of the `MessageStore` trait.
//!
//! ## SqliteMessageStore
//!
//! Persistent storage with headers normalized into a child table.
//!
//! **Advantages**:
//! - Data survives restarts
//! - Every add/update/remove is a single transaction; a failing statement
//!   rolls the whole operation back
//! - No external database server required
//!
//! **Limitations**:
//! - Single-file database; concurrent writers are serialized by SQLite
//!
//! ## Example
//!
//! ```rust
//! use message_core::{Message, MessageStore};
//! use message_sqlite::SqliteMessageStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), message_core::StoreError> {
//!     let store = SqliteMessageStore::new("sqlite::memory:").await?;
//!     store.add("m1", Message::new("m1", "hi").header("x", "1")).await?;
//!
//!     let message = store.get("m1").await?;
//!     assert_eq!(message.get_header("x"), Some("1"));
//!     Ok(())
//! }
//! ```
//!
//! ## Database Schema
//!
//! ```sql
//! CREATE TABLE messages (
//!     id TEXT PRIMARY KEY,
//!     content TEXT NOT NULL
//! );
//!
//! CREATE TABLE message_headers (
//!     message_id TEXT NOT NULL,
//!     key TEXT NOT NULL,
//!     value TEXT NOT NULL,
//!     PRIMARY KEY (message_id, key),
//!     FOREIGN KEY (message_id) REFERENCES messages(id) ON DELETE CASCADE
//! );
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use message_core::{Message, MessageStore, StoreError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// SQLite-based message store.
#[derive(Clone)]
pub struct SqliteMessageStore {
    pool: SqlitePool,
}

impl SqliteMessageStore {
    /// Opens (or creates) the database at `database_url` and bootstraps the schema.
    ///
    /// # Arguments
    ///
    /// * `database_url` - A file path (`./data/messages.db`), a `sqlite:` URL
    ///   (`sqlite://data/messages.db`, `sqlite::memory:`), or `:memory:`.
    ///
    /// # Returns
    ///
    /// A store on a pool of up to 5 connections with both tables in place.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the URL cannot be parsed, the parent
    /// directory cannot be created, the connection fails, or the schema
    /// statements fail.
    ///
    /// # External Interactions
    ///
    /// - **File System**: Creates the database file and its parent directory if missing
    /// - **SQLite**: Runs `CREATE TABLE IF NOT EXISTS` for `messages` and `message_headers`
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        Self::with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Like [`new`](Self::new) with an explicit pool size.
    ///
    /// # Arguments
    ///
    /// * `database_url` - Same forms as [`new`](Self::new).
    /// * `max_connections` - Pool size for file databases; values below 1 are raised to 1.
    ///   In-memory databases always use a single connection that never idles out,
    ///   since each SQLite connection would otherwise see its own private database.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new): any failure is reported as `StoreError::Storage`.
    ///
    /// # External Interactions
    ///
    /// - **File System**: Creates the parent directory of file databases (plain paths
    ///   and `sqlite:` URLs alike) before connecting
    /// - **SQLite**: Opens the pool with foreign keys enabled and bootstraps the schema
    pub async fn with_options(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let in_memory = is_in_memory(database_url);
        info!(database_url = %database_url, in_memory, "Opening SQLite message store");

        let options = connect_options(database_url)?;
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            ensure_parent_dir(options.get_filename()).await?;
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(StoreError::storage)?;

        let store = Self { pool };
        store.init_schema().await?;

        Ok(store)
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates both tables if they do not exist yet.
    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                content TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(StoreError::storage)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS message_headers (
                message_id TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (message_id, key),
                FOREIGN KEY (message_id) REFERENCES messages(id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(StoreError::storage)?;

        debug!("Message tables ready");
        Ok(())
    }

    async fn insert_headers(
        tx: &mut Transaction<'_, Sqlite>,
        id: &str,
        headers: &HashMap<String, String>,
    ) -> Result<(), StoreError> {
        for (key, value) in headers {
            sqlx::query("INSERT INTO message_headers (message_id, key, value) VALUES (?1, ?2, ?3)")
                .bind(id)
                .bind(key)
                .bind(value)
                .execute(&mut **tx)
                .await
                .map_err(StoreError::storage)?;
        }
        Ok(())
    }
}

/// True for URLs naming a private in-memory database.
fn is_in_memory(database_url: &str) -> bool {
    if database_url == ":memory:" || database_url.starts_with("sqlite::memory:") {
        return true;
    }
    database_url
        .split_once('?')
        .is_some_and(|(_, query)| query.split('&').any(|param| param == "mode=memory"))
}

fn connect_options(database_url: &str) -> Result<SqliteConnectOptions, StoreError> {
    let options = if database_url == ":memory:" {
        SqliteConnectOptions::from_str("sqlite::memory:").map_err(StoreError::storage)?
    } else if database_url.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(database_url).map_err(StoreError::storage)?
    } else {
        SqliteConnectOptions::new().filename(database_url)
    };

    Ok(options.create_if_missing(true).foreign_keys(true))
}

async fn ensure_parent_dir(filename: &Path) -> Result<(), StoreError> {
    match filename.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent)
            .await
            .map_err(StoreError::storage),
        _ => Ok(()),
    }
}

/// Maps an insert into `messages` failing on the primary key to `AlreadyExists`.
fn insert_error(id: &str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::AlreadyExists(id.to_string());
        }
    }
    StoreError::storage(err)
}

#[async_trait::async_trait]
impl MessageStore for SqliteMessageStore {
    async fn add(&self, id: &str, message: Message) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::storage)?;

        sqlx::query("INSERT INTO messages (id, content) VALUES (?1, ?2)")
            .bind(id)
            .bind(&message.content)
            .execute(&mut *tx)
            .await
            .map_err(|e| insert_error(id, e))?;

        Self::insert_headers(&mut tx, id, &message.headers).await?;

        tx.commit().await.map_err(StoreError::storage)?;

        info!(id = %id, header_count = message.headers.len(), "Message added to SQLite store");
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Message, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT content FROM messages WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::storage)?;

        let Some((content,)) = row else {
            debug!(id = %id, found = false, "SQLite store get returned");
            return Err(StoreError::NotFound(id.to_string()));
        };

        let headers: Vec<(String, String)> =
            sqlx::query_as("SELECT key, value FROM message_headers WHERE message_id = ?1")
                .bind(id)
                .fetch_all(&self.pool)
                .await
                .map_err(StoreError::storage)?;

        debug!(id = %id, found = true, header_count = headers.len(), "SQLite store get returned");
        Ok(Message::with_headers(id, content, headers.into_iter().collect()))
    }

    async fn update(&self, id: &str, message: Message) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::storage)?;

        let result = sqlx::query("UPDATE messages SET content = ?1 WHERE id = ?2")
            .bind(&message.content)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::storage)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        sqlx::query("DELETE FROM message_headers WHERE message_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::storage)?;

        Self::insert_headers(&mut tx, id, &message.headers).await?;

        tx.commit().await.map_err(StoreError::storage)?;

        info!(id = %id, header_count = message.headers.len(), "Message updated in SQLite store");
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::storage)?;

        sqlx::query("DELETE FROM message_headers WHERE message_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::storage)?;

        let result = sqlx::query("DELETE FROM messages WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::storage)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        tx.commit().await.map_err(StoreError::storage)?;

        info!(id = %id, "Message removed from SQLite store");
        Ok(())
    }

    async fn list(&self) -> Result<HashMap<String, Message>, StoreError> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT id, content FROM messages")
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::storage)?;

        let mut messages: HashMap<String, Message> = rows
            .into_iter()
            .map(|(id, content)| (id.clone(), Message::new(id, content)))
            .collect();

        let header_rows: Vec<(String, String, String)> =
            sqlx::query_as("SELECT message_id, key, value FROM message_headers")
                .fetch_all(&self.pool)
                .await
                .map_err(StoreError::storage)?;

        for (message_id, key, value) in header_rows {
            match messages.get_mut(&message_id) {
                Some(message) => message.set_header(key, value),
                None => warn!(message_id = %message_id, key = %key, "Skipping header without a message row"),
            }
        }

        debug!(count = messages.len(), "SQLite store list returned");
        Ok(messages)
    }
}
