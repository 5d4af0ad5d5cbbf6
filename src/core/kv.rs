//! Key-value storage seam.
//!
//! The build store and the plugins only ever see [`KeyValueStore`]. Reads of
//! persisted records go through [`read_json_or_default`], which turns missing,
//! unreadable and corrupt records into the default value.

use crate::core::error::QuadcalcError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, QuadcalcError>;
    fn set(&self, key: &str, value: &str) -> Result<(), QuadcalcError>;
}

/// In-memory store. Clones share contents, so a test can keep a handle after
/// moving one into a `BuildStore`.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: Rc<RefCell<HashMap<String, String>>>,
    quota: Rc<RefCell<Option<usize>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any single write larger than `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        let kv = Self::default();
        kv.set_quota(Some(bytes));
        kv
    }

    pub fn set_quota(&self, bytes: Option<usize>) {
        *self.quota.borrow_mut() = bytes;
    }

    /// Raw write that bypasses the quota, for seeding corrupt records.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, QuadcalcError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), QuadcalcError> {
        if let Some(quota) = *self.quota.borrow() {
            if value.len() > quota {
                return Err(QuadcalcError::StorageFull {
                    key: key.to_string(),
                    bytes: value.len(),
                    quota,
                });
            }
        }
        self.insert_raw(key, value);
        Ok(())
    }
}

/// Decode a JSON record, degrading to `T::default()` on any failure.
pub fn read_json_or_default<T>(kv: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match kv.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring corrupt record '{}': {}", key, e);
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!("Failed to read record '{}': {}", key, e);
            T::default()
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), QuadcalcError> {
    let raw = serde_json::to_string(value)?;
    kv.set(key, &raw)
}
