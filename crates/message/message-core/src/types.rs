//! # Core Types
//!
//! This module defines the message entity stored by every engine.
//!
//! ## Message
//!
//! A caller-identified record with a text body and a set of string headers.
//! The header mapping is always present; an empty mapping is the only
//! representation of "no headers".
//!
//! ## Wire format
//!
//! Serialized as `{"id": .., "body": .., "headers": {..}}`. A missing or
//! `null` `headers` field reads back as an empty mapping.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A stored message: id, text content and its headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Caller-supplied identifier, unique within a store
    pub id: String,
    /// Text body
    #[serde(rename = "body")]
    pub content: String,
    /// Header key/value pairs; keys are unique, order is not preserved
    #[serde(default, deserialize_with = "null_as_empty")]
    pub headers: HashMap<String, String>,
}

impl Message {
    /// Creates a message with no headers.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            headers: HashMap::new(),
        }
    }

    /// Creates a message with the given headers.
    pub fn with_headers(
        id: impl Into<String>,
        content: impl Into<String>,
        headers: HashMap<String, String>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            headers,
        }
    }

    /// Adds a header and returns the message (builder style).
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(key, value);
        self
    }

    /// Inserts a header, overwriting any previous value for `key`.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key.into(), value.into());
    }

    /// Returns the header value for `key`, or `None` when absent.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    /// Removes a header. Does nothing if `key` is absent.
    pub fn remove_header(&mut self, key: &str) {
        self.headers.remove(key);
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<HashMap<String, String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
