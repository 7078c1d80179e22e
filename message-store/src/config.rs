//! Store configuration: engine kind and env-based loading.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Result};
use message_core::MessageStore;
use message_inmemory::InMemoryMessageStore;
use message_sqlite::SqliteMessageStore;
use tracing::info;

const DEFAULT_SQLITE_PATH: &str = "./data/messages.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Storage engine behind a [`MessageStore`]. Matches env `MESSAGE_STORE_TYPE`: memory | sqlite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Memory,
    Sqlite,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" => Ok(StoreKind::Memory),
            "sqlite" => Ok(StoreKind::Sqlite),
            other => bail!("Unknown MESSAGE_STORE_TYPE '{}': expected memory or sqlite", other),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Memory => write!(f, "memory"),
            StoreKind::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Store config: engine kind, SQLite location and pool size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub kind: StoreKind,
    /// File path or `sqlite:` URL; only used by [`StoreKind::Sqlite`].
    pub sqlite_path: String,
    pub sqlite_max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::default(),
            sqlite_path: DEFAULT_SQLITE_PATH.to_string(),
            sqlite_max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl StoreConfig {
    /// Load from environment variables (MESSAGE_STORE_TYPE, MESSAGE_SQLITE_PATH, MESSAGE_SQLITE_MAX_CONNECTIONS).
    ///
    /// Load `.env` (e.g. `dotenvy::dotenv()`) before calling this if you use one.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key → value source; missing keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = match lookup("MESSAGE_STORE_TYPE") {
            Some(value) => value.parse()?,
            None => StoreKind::default(),
        };
        let sqlite_path =
            lookup("MESSAGE_SQLITE_PATH").unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string());
        let sqlite_max_connections = lookup("MESSAGE_SQLITE_MAX_CONNECTIONS")
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Ok(Self {
            kind,
            sqlite_path,
            sqlite_max_connections,
        })
    }
}

/// Creates the configured engine. The choice is made once; callers only see the trait.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn MessageStore>> {
    info!(kind = %config.kind, "Opening message store");

    let store: Arc<dyn MessageStore> = match config.kind {
        StoreKind::Memory => Arc::new(InMemoryMessageStore::new()),
        StoreKind::Sqlite => Arc::new(
            SqliteMessageStore::with_options(&config.sqlite_path, config.sqlite_max_connections)
                .await?,
        ),
    };

    Ok(store)
}
