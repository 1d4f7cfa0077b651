//! Safe storage primitives for draft persistence.
//!
//! Browser storage can throw at any call (quota exceeded, storage disabled, private mode). These
//! wrappers shield every call site: failures are logged and degrade to "draft not saved" rather
//! than reaching the form.

use draft_host::{load_typed_with, save_typed_with, DraftNotice, DraftStorage, NoticeSink};
use leptos::logging;
use serde::{de::DeserializeOwned, Serialize};

/// Shown when a debounced draft write is refused by storage.
pub const SAVE_FAILED_MESSAGE: &str =
    "Your changes could not be saved locally. They will be lost if you leave this page.";

/// Returns the value stored under `key`, or `default` when the key is absent, unreadable, or
/// holds data that does not deserialize as `T`.
pub fn get_or<T: DeserializeOwned>(storage: &dyn DraftStorage, key: &str, default: T) -> T {
    get(storage, key).unwrap_or(default)
}

/// Returns the value stored under `key`, or `None` when it is absent or unusable.
pub fn get<T: DeserializeOwned>(storage: &dyn DraftStorage, key: &str) -> Option<T> {
    match load_typed_with(storage, key) {
        Ok(value) => value,
        Err(err) => {
            logging::warn!("Error retrieving {key} from storage: {err}");
            None
        }
    }
}

/// Serializes and stores `value` under `key`. Returns `false` (after logging) on failure.
pub fn set<T: Serialize + ?Sized>(storage: &dyn DraftStorage, key: &str, value: &T) -> bool {
    match save_typed_with(storage, key, value) {
        Ok(()) => true,
        Err(err) => {
            logging::warn!("Error storing {key} in storage: {err}");
            false
        }
    }
}

/// Deletes `key`. Returns `true` when the key is gone afterwards, including when it was already
/// absent, and `false` (after logging) on failure.
pub fn remove(storage: &dyn DraftStorage, key: &str) -> bool {
    match storage.delete_raw(key) {
        Ok(()) => true,
        Err(err) => {
            logging::warn!("Error removing {key} from storage: {err}");
            false
        }
    }
}

/// [`set`], reporting a failed write to the user through `notices`.
pub fn set_or_notify<T: Serialize + ?Sized>(
    storage: &dyn DraftStorage,
    key: &str,
    value: &T,
    notices: &dyn NoticeSink,
) -> bool {
    let written = set(storage, key, value);
    if !written {
        notices.notify(DraftNotice::error(SAVE_FAILED_MESSAGE));
    }
    written
}

#[cfg(test)]
mod tests {
    use draft_host::{MemoryDraftStorage, MemoryNoticeSink};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::*;

    struct BrokenStorage;

    impl DraftStorage for BrokenStorage {
        fn load_raw(&self, _key: &str) -> Result<Option<String>, String> {
            Err("storage disabled".to_string())
        }

        fn save_raw(&self, _key: &str, _raw_json: &str) -> Result<(), String> {
            Err("storage disabled".to_string())
        }

        fn delete_raw(&self, _key: &str) -> Result<(), String> {
            Err("storage disabled".to_string())
        }
    }

    #[test]
    fn set_then_get_round_trips_json_values() {
        let storage = MemoryDraftStorage::default();
        let value = json!({
            "name": "Alice",
            "tags": ["a", "b"],
            "nested": {"n": 1, "ok": true, "none": null}
        });
        assert!(set(&storage, "k", &value));
        assert_eq!(get_or(&storage, "k", Value::Null), value);
    }

    #[test]
    fn remove_then_get_returns_default() {
        let storage = MemoryDraftStorage::default();
        assert!(set(&storage, "k", &vec!["x"]));
        assert!(remove(&storage, "k"));
        assert_eq!(get_or(&storage, "k", vec!["default".to_string()]), vec!["default"]);
        assert!(!storage.contains_key("k"));
    }

    #[test]
    fn removing_an_absent_key_succeeds() {
        let storage = MemoryDraftStorage::default();
        assert!(remove(&storage, "never-written"));
    }

    #[test]
    fn corrupt_json_falls_back_to_default() {
        let storage = MemoryDraftStorage::default();
        storage.insert_raw("k", "{\"unterminated\": ");
        assert_eq!(get_or(&storage, "k", 7_u32), 7);
    }

    #[test]
    fn foreign_json_shape_falls_back_to_default() {
        let storage = MemoryDraftStorage::default();
        storage.insert_raw("k", "{\"not\": \"a list\"}");
        assert_eq!(get_or::<Vec<u32>>(&storage, "k", Vec::new()), Vec::<u32>::new());
    }

    #[test]
    fn quota_failure_returns_false_and_keeps_old_value() {
        let storage = MemoryDraftStorage::with_quota(32);
        assert!(set(&storage, "k", "short"));
        assert!(!set(&storage, "k", &"x".repeat(64)));
        assert_eq!(get_or(&storage, "k", String::new()), "short");
    }

    #[test]
    fn broken_storage_never_raises() {
        assert_eq!(get_or(&BrokenStorage, "k", 3_u8), 3);
        assert!(!set(&BrokenStorage, "k", &1_u8));
        assert!(!remove(&BrokenStorage, "k"));
    }

    #[test]
    fn failed_write_is_reported_once() {
        let notices = MemoryNoticeSink::default();
        assert!(!set_or_notify(&BrokenStorage, "k", &1_u8, &notices));
        assert_eq!(notices.take(), vec![DraftNotice::error(SAVE_FAILED_MESSAGE)]);

        let storage = MemoryDraftStorage::default();
        assert!(set_or_notify(&storage, "k", &1_u8, &notices));
        assert!(notices.notices().is_empty());
    }
}
