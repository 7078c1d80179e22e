//! Store error types.
//!
//! Returned by every [`MessageStore`](crate::MessageStore) implementation.

use thiserror::Error;

/// Boxed engine error carried by [`StoreError::Storage`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when using store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Storage error: {0}")]
    Storage(#[source] BoxError),
}

impl StoreError {
    /// Wraps an underlying engine error.
    pub fn storage<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        StoreError::Storage(err.into())
    }

    /// True for [`StoreError::NotFound`]; callers map this to a missing-resource response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
