//! # Message Core
//!
//! Core types and traits for message storage.
//! Used by the storage engines (`message-inmemory`, `message-sqlite`) and the `message-store` facade.
//!
//! ## Modules
//!
//! - [`types`] - Message entity and header accessors
//! - [`store`] - MessageStore trait
//! - [`error`] - StoreError (NotFound, AlreadyExists, Storage)

pub mod error;
pub mod store;
pub mod types;

pub use error::*;
pub use store::*;
pub use types::*;
