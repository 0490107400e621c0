//! Session storage.
//!
//! The core reads and writes JSON values by string key and never locks
//! across a read-modify-write; hosts serialise requests per session.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::SessionKeys;
use crate::error::{Error, Result};

/// Key-value backing store for persisted trees, state and registries.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
    fn delete(&self, key: &str);

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Value) {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) {
        (**self).delete(key)
    }

    fn contains(&self, key: &str) -> bool {
        (**self).contains(key)
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Concurrent in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort_unstable();
        keys
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

// =============================================================================
// Typed access
// =============================================================================

/// Load and decode `key`, or `T::default()` when absent.
pub fn load<T, S>(store: &S, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
    S: SessionStore + ?Sized,
{
    match store.get(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value).map_err(|source| Error::Store {
            key: key.to_string(),
            source,
        }),
    }
}

/// Encode and store `value` under `key`.
pub fn save<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: SessionStore + ?Sized,
{
    let value = serde_json::to_value(value).map_err(|source| Error::Store {
        key: key.to_string(),
        source,
    })?;
    store.set(key, value);
    Ok(())
}

/// Delete everything persisted under `keys`.
pub fn purge<S: SessionStore + ?Sized>(store: &S, keys: &SessionKeys) {
    for key in keys.all() {
        store.delete(key);
    }
}
