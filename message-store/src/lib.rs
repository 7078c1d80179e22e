//! # Message Store
//!
//! Entry point for callers of the message storage layer (e.g. an HTTP handler).
//! Re-exports the entity, the [`MessageStore`] contract and both engines, and
//! chooses an engine from configuration at construction time.
//!
//! ## Modules
//!
//! - [`config`] - StoreKind, StoreConfig (env-based), open_store
//! - [`logger`] - tracing initialization
//!
//! ## Quick Start
//!
//! ```rust
//! use message_store::{open_store, Message, StoreConfig, StoreKind};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = StoreConfig {
//!         kind: StoreKind::Memory,
//!         ..StoreConfig::default()
//!     };
//!     let store = open_store(&config).await?;
//!
//!     store.add("m1", Message::new("m1", "hi")).await?;
//!     assert!(store.get("missing").await.unwrap_err().is_not_found());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod logger;

pub use config::{open_store, StoreConfig, StoreKind};
pub use logger::init_tracing;
pub use message_core::{Message, MessageStore, StoreError};
pub use message_inmemory::InMemoryMessageStore;
pub use message_sqlite::SqliteMessageStore;
