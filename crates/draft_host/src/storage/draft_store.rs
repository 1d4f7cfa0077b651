//! Key/value draft storage contracts and in-process adapters.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// Host service for draft values (JSON stored as text per key).
///
/// Calls are synchronous because the browser backend (`localStorage`) is synchronous and draft
/// owners must be able to flush during teardown.
pub trait DraftStorage {
    /// Loads the raw JSON string stored under `key`, or `None` when the key is absent.
    fn load_raw(&self, key: &str) -> Result<Option<String>, String>;

    /// Saves a raw JSON string under `key`, replacing any previous value.
    fn save_raw(&self, key: &str, raw_json: &str) -> Result<(), String>;

    /// Deletes `key`. Deleting an absent key succeeds.
    fn delete_raw(&self, key: &str) -> Result<(), String>;
}

impl<S: DraftStorage + ?Sized> DraftStorage for Rc<S> {
    fn load_raw(&self, key: &str) -> Result<Option<String>, String> {
        (**self).load_raw(key)
    }

    fn save_raw(&self, key: &str, raw_json: &str) -> Result<(), String> {
        (**self).save_raw(key, raw_json)
    }

    fn delete_raw(&self, key: &str) -> Result<(), String> {
        (**self).delete_raw(key)
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op draft storage for unsupported targets and baseline tests.
pub struct NoopDraftStorage;

impl DraftStorage for NoopDraftStorage {
    fn load_raw(&self, _key: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn save_raw(&self, _key: &str, _raw_json: &str) -> Result<(), String> {
        Ok(())
    }

    fn delete_raw(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryInner {
    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory draft storage keyed by string.
///
/// Clones share the same entries, so a test can hand one clone to a draft store and inspect the
/// other. An optional byte quota makes writes fail the way a full `localStorage` does.
pub struct MemoryDraftStorage {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryDraftStorage {
    /// Creates an empty store that rejects writes once keys plus values exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().quota_bytes = Some(quota_bytes);
        store
    }

    /// Seeds a raw value without quota checks (useful for corrupt-data fixtures).
    pub fn insert_raw(&self, key: impl Into<String>, raw: impl Into<String>) {
        self.inner
            .borrow_mut()
            .entries
            .insert(key.into(), raw.into());
    }

    /// Returns the raw value stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }

    /// Returns whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.borrow().entries.contains_key(key)
    }

    /// Returns all present keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = self
            .inner
            .borrow()
            .entries
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        keys.sort();
        keys
    }
}

impl DraftStorage for MemoryDraftStorage {
    fn load_raw(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.raw(key))
    }

    fn save_raw(&self, key: &str, raw_json: &str) -> Result<(), String> {
        let mut inner = self.inner.borrow_mut();
        if let Some(quota) = inner.quota_bytes {
            let needed = inner.used_bytes_without(key) + key.len() + raw_json.len();
            if needed > quota {
                return Err(format!(
                    "storage quota exceeded writing `{key}` ({needed} > {quota} bytes)"
                ));
            }
        }
        inner.entries.insert(key.to_string(), raw_json.to_string());
        Ok(())
    }

    fn delete_raw(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().entries.remove(key);
        Ok(())
    }
}
