//! Draft storage contracts and typed JSON helpers.

pub mod draft_store;

use serde::{de::DeserializeOwned, Serialize};

use draft_store::DraftStorage;

/// Loads and deserializes a typed value through a [`DraftStorage`] implementation.
///
/// # Errors
///
/// Returns an error when the store read or JSON deserialization fails.
pub fn load_typed_with<S: DraftStorage + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_raw(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| format!("`{key}` is not valid: {e}"))?;
    Ok(Some(value))
}

/// Serializes and saves a typed value through a [`DraftStorage`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_typed_with<S: DraftStorage + ?Sized, T: Serialize + ?Sized>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save_raw(key, &raw)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::MemoryDraftStorage;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Contact {
        name: String,
        age: String,
    }

    #[test]
    fn typed_helpers_round_trip() {
        let store = MemoryDraftStorage::default();
        let contact = Contact {
            name: "Alice".to_string(),
            age: "30".to_string(),
        };
        save_typed_with(&store, "contact", &contact).expect("save typed");

        let loaded: Option<Contact> = load_typed_with(&store, "contact").expect("load typed");
        assert_eq!(loaded, Some(contact));
    }

    #[test]
    fn typed_load_of_absent_key_is_none() {
        let store = MemoryDraftStorage::default();
        let loaded: Option<Contact> = load_typed_with(&store, "missing").expect("load");
        assert_eq!(loaded, None);
    }

    #[test]
    fn typed_load_reports_corrupt_json() {
        let store = MemoryDraftStorage::default();
        store.insert_raw("contact", "{not json");
        let err = load_typed_with::<_, Contact>(&store, "contact").expect_err("corrupt");
        assert!(err.contains("contact"));
    }

    #[derive(Debug)]
    struct NonSerializable;

    impl Serialize for NonSerializable {
        fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            Err(serde::ser::Error::custom("boom"))
        }
    }

    #[test]
    fn typed_save_reports_serialization_error_without_writing() {
        let store = MemoryDraftStorage::default();
        let err = save_typed_with(&store, "k", &NonSerializable).expect_err("serialize");
        assert!(err.contains("boom"));
        assert!(!store.contains_key("k"));
    }
}
