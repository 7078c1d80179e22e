//! # In-Memory Message Store
//!
//! This crate provides an in-memory implementation of the `MessageStore` trait from `message-core`.
//!
//! ## InMemoryMessageStore
//!
//! A single id → message map held in process memory.
//!
//! **Advantages**:
//! - No I/O, every operation is a map lookup
//! - Nothing to set up; good for tests and development
//!
//! **Limitations**:
//! - Data is lost on restart
//! - Limited by available memory
//!
//! ## Example
//!
//! ```rust
//! use message_core::{Message, MessageStore};
//! use message_inmemory::InMemoryMessageStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), message_core::StoreError> {
//!     let store = InMemoryMessageStore::new();
//!     store.add("m1", Message::new("m1", "hi").header("x", "1")).await?;
//!
//!     let message = store.get("m1").await?;
//!     assert_eq!(message.get_header("x"), Some("1"));
//!     Ok(())
//! }
//! ```
//!
//! ## Thread Safety
//!
//! The map sits behind `Arc<RwLock<>>`; each operation holds the lock across its
//! whole check-then-act sequence. Messages go in by value and come out as clones,
//! so no caller ever aliases stored state.

use std::collections::HashMap;
use std::sync::Arc;

use message_core::{Message, MessageStore, StoreError};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// In-memory message store.
#[derive(Debug, Clone)]
pub struct InMemoryMessageStore {
    messages: Arc<RwLock<HashMap<String, Message>>>,
}

impl InMemoryMessageStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of messages in the store.
    pub async fn len(&self) -> usize {
        let messages = self.messages.read().await;
        messages.len()
    }

    /// Returns true if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Clears all messages from the store.
    pub async fn clear(&self) {
        let mut messages = self.messages.write().await;
        messages.clear();
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn add(&self, id: &str, mut message: Message) -> Result<(), StoreError> {
        let mut messages = self.messages.write().await;
        if messages.contains_key(id) {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }

        message.id = id.to_string();
        let header_count = message.headers.len();
        messages.insert(id.to_string(), message);
        drop(messages);

        info!(id = %id, header_count, "Message added to in-memory store");
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Message, StoreError> {
        let messages = self.messages.read().await;
        let result = messages
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()));
        debug!(id = %id, found = result.is_ok(), "In-memory store get returned");
        result
    }

    async fn update(&self, id: &str, mut message: Message) -> Result<(), StoreError> {
        let mut messages = self.messages.write().await;
        let slot = messages
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        message.id = id.to_string();
        let header_count = message.headers.len();
        *slot = message;
        drop(messages);

        info!(id = %id, header_count, "Message updated in in-memory store");
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut messages = self.messages.write().await;
        messages
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        drop(messages);

        info!(id = %id, "Message removed from in-memory store");
        Ok(())
    }

    async fn list(&self) -> Result<HashMap<String, Message>, StoreError> {
        let messages = self.messages.read().await;
        let snapshot = messages.clone();
        debug!(count = snapshot.len(), "In-memory store list returned");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_message(id: &str, content: &str) -> Message {
        Message::new(id, content).header("a", "1").header("b", "2")
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let store = InMemoryMessageStore::new();
        let message = create_test_message("m1", "Test");

        store.add("m1", message.clone()).await.unwrap();

        let found = store.get("m1").await.unwrap();
        assert_eq!(found, message);
    }

    #[tokio::test]
    async fn test_add_uses_id_argument() {
        let store = InMemoryMessageStore::new();
        store.add("m1", Message::new("other", "Test")).await.unwrap();

        let found = store.get("m1").await.unwrap();
        assert_eq!(found.id, "m1");
        assert!(store.get("other").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_add_duplicate_rejected() {
        let store = InMemoryMessageStore::new();
        store.add("m1", Message::new("m1", "first")).await.unwrap();

        let err = store.add("m1", Message::new("m1", "second")).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(id) if id == "m1"));

        let found = store.get("m1").await.unwrap();
        assert_eq!(found.content, "first");
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let store = InMemoryMessageStore::new();
        let err = store.get("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_replaces_headers() {
        let store = InMemoryMessageStore::new();
        store.add("m1", create_test_message("m1", "Original")).await.unwrap();

        store
            .update("m1", Message::new("m1", "Updated").header("c", "3"))
            .await
            .unwrap();

        let found = store.get("m1").await.unwrap();
        assert_eq!(found.content, "Updated");
        assert_eq!(found.headers.len(), 1);
        assert_eq!(found.get_header("c"), Some("3"));
        assert_eq!(found.get_header("a"), None);
    }

    #[tokio::test]
    async fn test_update_nonexistent() {
        let store = InMemoryMessageStore::new();
        let err = store.update("missing", Message::new("missing", "x")).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryMessageStore::new();
        store.add("m1", create_test_message("m1", "Test")).await.unwrap();

        store.remove("m1").await.unwrap();

        assert!(store.get("m1").await.unwrap_err().is_not_found());
        assert!(store.remove("m1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_stored_copy_is_independent() {
        let store = InMemoryMessageStore::new();
        let mut message = create_test_message("m1", "Test");
        store.add("m1", message.clone()).await.unwrap();

        message.set_header("a", "changed");
        message.content = "changed".to_string();

        let mut read = store.get("m1").await.unwrap();
        assert_eq!(read.content, "Test");
        assert_eq!(read.get_header("a"), Some("1"));

        read.set_header("z", "9");
        assert_eq!(store.get("m1").await.unwrap().get_header("z"), None);
    }

    #[tokio::test]
    async fn test_list() {
        let store = InMemoryMessageStore::new();
        assert!(store.list().await.unwrap().is_empty());

        store.add("m1", create_test_message("m1", "one")).await.unwrap();
        store.add("m2", Message::new("m2", "two")).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all["m1"].headers.len(), 2);
        assert!(all["m2"].headers.is_empty());
    }

    #[tokio::test]
    async fn test_len_and_is_empty() {
        let store = InMemoryMessageStore::new();

        assert!(store.is_empty().await);
        assert_eq!(store.len().await, 0);

        store.add("m1", create_test_message("m1", "Test")).await.unwrap();

        assert!(!store.is_empty().await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = InMemoryMessageStore::new();
        store.add("m1", create_test_message("m1", "Test")).await.unwrap();

        assert_eq!(store.len().await, 1);

        store.clear().await;

        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_adds() {
        let store = InMemoryMessageStore::new();

        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let id = format!("m{}", i);
                    store.add(&id, Message::new(id.clone(), "x")).await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.len().await, 32);
    }
}
