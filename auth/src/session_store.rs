//! Persistent session store.
//!
//! A key-value cell holding the opaque auth token. The route guard only
//! reads it; the login flow outside this crate writes it.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Synchronous read access to the session store.
pub trait SessionReader: Send + Sync {
    /// Value stored under `key`, if any.
    fn read(&self, key: &str) -> Option<String>;
}

/// Read-write session store.
pub trait SessionStore: SessionReader {
    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str);

    /// Remove `key`.
    fn remove(&self, key: &str);
}

impl<T: SessionReader + ?Sized> SessionReader for Arc<T> {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn write(&self, key: &str, value: &str) {
        (**self).write(key, value);
    }

    fn remove(&self, key: &str) {
        (**self).remove(key);
    }
}

/// In-process session store.
///
/// Clones share the same cell, so a clone handed to the guard observes every
/// write made through another clone.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a single entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.write(key, value);
        store
    }
}

// A poisoned lock still holds a consistent map: every write is a single insert
impl SessionReader for MemorySessionStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl SessionStore for MemorySessionStore {
    fn write(&self, key: &str, value: &str) {
        tracing::debug!(key, "Session entry written");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        tracing::debug!(key, "Session entry removed");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
