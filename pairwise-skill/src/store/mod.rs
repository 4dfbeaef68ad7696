//! Durable key-value persistence for session state.
//!
//! Values are JSON documents. Reads never fail the caller: a missing key yields `None`,
//! and an unparseable value is logged and also yields `None`, so every load site falls
//! back to its default.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
use serde::{Serialize, de::DeserializeOwned};

pub const COMPETITORS_KEY: &str = "characters-data";
pub const HISTORY_KEY: &str = "match-history";
pub const QUEUE_KEY: &str = "match-queue";
pub const CURRENT_PAIR_KEY: &str = "current-match-pair";
pub const NEXT_PAIR_KEY: &str = "next-match-pair";
pub const TIER_CONFIG_KEY: &str = "tier-config";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {key:?}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid store key {0:?}")]
    InvalidKey(String),
}

/// A synchronous key-value store exclusively owned by one session.
pub trait Store {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Reads and parses the value at `key`. Malformed entries are logged and treated as absent.
pub fn read_json<T: DeserializeOwned, S: Store + ?Sized>(store: &S, key: &str) -> Option<T> {
    let stored = store.get(key)?;
    match serde_json::from_str(&stored) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Failed to parse stored {:?}, using default: {}", key, e);
            None
        }
    }
}

/// Serializes `value` into `key`. Failures are logged rather than propagated.
pub fn write_json<T: Serialize + ?Sized, S: Store + ?Sized>(store: &mut S, key: &str, value: &T) {
    let write_res = serde_json::to_string(value)
        .map_err(|e| e.to_string())
        .and_then(|json| store.set(key, json).map_err(|e| e.to_string()));
    if let Err(msg) = write_res {
        tracing::error!("WARNING: failed write to {:?} because {}", key, msg);
    }
}

/// Removes `key`, logging any failure.
pub fn clear<S: Store + ?Sized>(store: &mut S, key: &str) {
    if let Err(e) = store.remove(key) {
        tracing::error!("WARNING: failed to remove {:?} because {}", key, e);
    }
}
