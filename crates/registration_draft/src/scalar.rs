//! Single-record drafts.

use std::{fmt, rc::Rc};

use draft_host::{DraftStorage, NoticeSink, TimerScheduler};
use leptos::logging;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{debounce::Debouncer, error::DraftError, persistence, phase::DraftPhase};

/// How a persisted record is combined with the defaults during hydration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HydrationPolicy {
    /// The persisted record is authoritative; one that no longer decodes is discarded.
    #[default]
    Replace,
    /// Persisted top-level fields overlay the defaults, so fields added since the record was
    /// written keep their default values and unknown stored fields are ignored.
    MergeWithDefaults,
}

impl HydrationPolicy {
    fn resolve<T: Serialize + DeserializeOwned>(
        self,
        defaults: &T,
        stored: Value,
    ) -> Result<T, serde_json::Error> {
        match self {
            Self::Replace => serde_json::from_value(stored),
            Self::MergeWithDefaults => {
                let merged = match (serde_json::to_value(defaults)?, stored) {
                    (Value::Object(mut base), Value::Object(overlay)) => {
                        base.extend(overlay);
                        Value::Object(base)
                    }
                    (_, other) => other,
                };
                serde_json::from_value(merged)
            }
        }
    }
}

/// A persisted single record, written through a debounce after every change.
pub struct ScalarDraftStore<T: Clone + Serialize + DeserializeOwned + 'static> {
    key: String,
    defaults: T,
    value: T,
    phase: DraftPhase,
    policy: HydrationPolicy,
    storage: Rc<dyn DraftStorage>,
    writer: Debouncer<T>,
}

impl<T: Clone + Serialize + DeserializeOwned + 'static> fmt::Debug for ScalarDraftStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarDraftStore")
            .field("key", &self.key)
            .field("phase", &self.phase)
            .field("policy", &self.policy)
            .field("pending_write", &self.writer.is_pending())
            .finish()
    }
}

impl<T: Clone + Serialize + DeserializeOwned + 'static> ScalarDraftStore<T> {
    /// Creates an unhydrated store over `key` holding `defaults`. Writes refused by storage are
    /// reported to `notices`.
    pub fn new(
        key: impl Into<String>,
        defaults: T,
        policy: HydrationPolicy,
        storage: Rc<dyn DraftStorage>,
        scheduler: Rc<dyn TimerScheduler>,
        notices: Rc<dyn NoticeSink>,
        debounce_ms: u32,
    ) -> Self {
        let key = key.into();
        let writer = {
            let storage = storage.clone();
            let key = key.clone();
            Debouncer::new(scheduler, debounce_ms, move |value: T| {
                persistence::set_or_notify(&*storage, &key, &value, &*notices);
            })
        };
        Self {
            value: defaults.clone(),
            defaults,
            key,
            phase: DraftPhase::Uninitialized,
            policy,
            storage,
            writer,
        }
    }

    /// Storage key of this store.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> DraftPhase {
        self.phase
    }

    /// Returns whether hydration finished and mutations are accepted.
    pub fn is_ready(&self) -> bool {
        self.phase.is_ready()
    }

    /// Hydration policy in use.
    pub fn policy(&self) -> HydrationPolicy {
        self.policy
    }

    /// Current record.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Record used when nothing usable is stored.
    pub fn defaults(&self) -> &T {
        &self.defaults
    }

    /// Marks the storage read as in flight. Returns `false` unless the store was
    /// [`DraftPhase::Uninitialized`].
    pub fn begin_hydration(&mut self) -> bool {
        if self.phase != DraftPhase::Uninitialized {
            return false;
        }
        self.phase = DraftPhase::Hydrating;
        true
    }

    /// Reads the stored JSON; `None` when absent, `null`, or unreadable.
    pub fn load_persisted(&self) -> Option<Value> {
        persistence::get::<Value>(&*self.storage, &self.key).filter(|value| !value.is_null())
    }

    /// Applies a hydration result and moves to [`DraftPhase::Ready`] without scheduling a write.
    /// Returns whether a stored record was restored.
    ///
    /// Late results (after disposal or a completed hydration) are dropped.
    pub fn complete_hydration(&mut self, loaded: Option<Value>) -> bool {
        if !matches!(self.phase, DraftPhase::Uninitialized | DraftPhase::Hydrating) {
            return false;
        }
        let restored = match loaded {
            Some(stored) => match self.policy.resolve(&self.defaults, stored) {
                Ok(value) => {
                    self.value = value;
                    true
                }
                Err(err) => {
                    logging::warn!("Discarding stored draft `{}`: {err}", self.key);
                    self.value = self.defaults.clone();
                    false
                }
            },
            None => false,
        };
        self.phase = DraftPhase::Ready;
        restored
    }

    /// Synchronous hydration: begin, read, complete. Returns whether a record was restored.
    pub fn hydrate(&mut self) -> bool {
        self.begin_hydration();
        let loaded = self.load_persisted();
        self.complete_hydration(loaded)
    }

    fn ensure_ready(&self) -> Result<(), DraftError> {
        if self.phase.is_ready() {
            Ok(())
        } else {
            Err(DraftError::NotReady {
                key: self.key.clone(),
                phase: self.phase,
            })
        }
    }

    /// Replaces the record and schedules a write.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] outside [`DraftPhase::Ready`].
    pub fn set(&mut self, value: T) -> Result<(), DraftError> {
        self.ensure_ready()?;
        self.value = value;
        self.writer.call(self.value.clone());
        Ok(())
    }

    /// Edits the record in place and schedules a write.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] outside [`DraftPhase::Ready`].
    pub fn modify(&mut self, edit: impl FnOnce(&mut T)) -> Result<(), DraftError> {
        self.ensure_ready()?;
        edit(&mut self.value);
        self.writer.call(self.value.clone());
        Ok(())
    }

    /// Replaces the in-memory record without persisting it and drops any pending write.
    pub fn reset_to(&mut self, value: T) {
        self.writer.cancel();
        self.value = value;
    }

    /// Deletes the key, keeping the in-memory record. A pending write is dropped so it cannot
    /// recreate the key. Returns whether the key is absent afterwards.
    pub fn clear_storage(&mut self) -> bool {
        self.writer.cancel();
        persistence::remove(&*self.storage, &self.key)
    }

    /// Returns whether a debounced write is waiting.
    pub fn has_pending_write(&self) -> bool {
        self.writer.is_pending()
    }

    /// Writes any pending change now. Returns whether a write ran.
    pub fn flush(&self) -> bool {
        self.writer.flush()
    }

    /// Flushes pending state and stops accepting mutations or hydration results.
    pub fn dispose(&mut self) {
        if self.phase == DraftPhase::Disposed {
            return;
        }
        self.flush();
        self.phase = DraftPhase::Disposed;
    }
}
