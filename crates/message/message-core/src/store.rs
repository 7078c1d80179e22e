//! # Message Storage
//!
//! This module defines the storage interface for messages.
//!
//! The `MessageStore` trait is implemented by storage backends (in-memory, SQLite).
//! Callers hold an `Arc<dyn MessageStore>` and never depend on which engine is behind it.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::Message;

/// Trait for storing and retrieving messages by id.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Adds a new message under `id`. Fails with `AlreadyExists` if `id` is taken.
    async fn add(&self, id: &str, message: Message) -> Result<(), StoreError>;

    /// Retrieves a message with all its headers. Fails with `NotFound` if absent.
    async fn get(&self, id: &str) -> Result<Message, StoreError>;

    /// Replaces content and the whole header set of an existing message.
    /// Fails with `NotFound` if absent; never creates.
    async fn update(&self, id: &str, message: Message) -> Result<(), StoreError>;

    /// Deletes a message and its headers. Fails with `NotFound` if absent.
    async fn remove(&self, id: &str) -> Result<(), StoreError>;

    /// Returns every stored message keyed by id. No ordering.
    async fn list(&self) -> Result<HashMap<String, Message>, StoreError>;
}
