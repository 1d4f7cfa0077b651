//! Ordered, id-addressed list drafts.

use std::{fmt, rc::Rc};

use draft_host::{next_item_id, DraftStorage, NoticeSink, TimerScheduler};
use leptos::logging;

use crate::{
    debounce::Debouncer,
    error::DraftError,
    model::{valid_items, DraftListItem},
    persistence,
    phase::DraftPhase,
};

/// A persisted list of [`DraftListItem`]s.
///
/// Every mutation produces a new list value and schedules one debounced write of the whole list.
/// Item order is insertion order and ids never change once assigned.
pub struct CollectionDraftStore<T: DraftListItem> {
    key: String,
    default_items: Vec<T>,
    items: Vec<T>,
    phase: DraftPhase,
    storage: Rc<dyn DraftStorage>,
    writer: Debouncer<Vec<T>>,
}

impl<T: DraftListItem> fmt::Debug for CollectionDraftStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionDraftStore")
            .field("key", &self.key)
            .field("phase", &self.phase)
            .field("len", &self.items.len())
            .field("pending_write", &self.writer.is_pending())
            .finish()
    }
}

impl<T: DraftListItem> CollectionDraftStore<T> {
    /// Creates an unhydrated store over `key`. `default_items` is shown until hydration and
    /// used when nothing usable is stored. Writes refused by storage are reported to `notices`.
    pub fn new(
        key: impl Into<String>,
        default_items: Vec<T>,
        storage: Rc<dyn DraftStorage>,
        scheduler: Rc<dyn TimerScheduler>,
        notices: Rc<dyn NoticeSink>,
        debounce_ms: u32,
    ) -> Self {
        let key = key.into();
        let writer = {
            let storage = storage.clone();
            let key = key.clone();
            Debouncer::new(scheduler, debounce_ms, move |items: Vec<T>| {
                persistence::set_or_notify(&*storage, &key, &items, &*notices);
            })
        };
        Self {
            items: default_items.clone(),
            default_items,
            key,
            phase: DraftPhase::Uninitialized,
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

    /// Current items in insertion order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Items whose required fields are all filled in.
    pub fn valid_items(&self) -> Vec<T> {
        valid_items(&self.items)
    }

    /// Returns the item with `id`.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
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

    /// Reads the persisted list; `None` when absent or unusable.
    pub fn load_persisted(&self) -> Option<Vec<T>> {
        persistence::get(&*self.storage, &self.key)
    }

    /// Applies a hydration result and moves to [`DraftPhase::Ready`] without scheduling a write.
    ///
    /// Results arriving after [`CollectionDraftStore::dispose`] or a completed hydration are
    /// dropped; the return value says whether `loaded` was applied.
    pub fn complete_hydration(&mut self, loaded: Option<Vec<T>>) -> bool {
        match self.phase {
            DraftPhase::Uninitialized | DraftPhase::Hydrating => {
                self.items = loaded.unwrap_or_else(|| self.default_items.clone());
                self.phase = DraftPhase::Ready;
                true
            }
            DraftPhase::Ready | DraftPhase::Disposed => false,
        }
    }

    /// Synchronous hydration: begin, read, complete.
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

    fn changed(&self) {
        self.writer.call(self.items.clone());
    }

    /// Appends `item`.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] outside [`DraftPhase::Ready`] and [`DraftError::DuplicateId`]
    /// when the id is already present.
    pub fn add(&mut self, item: T) -> Result<(), DraftError> {
        self.ensure_ready()?;
        if self.get(item.id()).is_some() {
            return Err(DraftError::DuplicateId {
                key: self.key.clone(),
                id: item.id().to_string(),
            });
        }
        self.items.push(item);
        self.changed();
        Ok(())
    }

    /// Appends a blank item under a fresh id and returns the id.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] outside [`DraftPhase::Ready`].
    pub fn add_blank(&mut self) -> Result<String, DraftError> {
        self.ensure_ready()?;
        let id = next_item_id(|candidate| self.get(candidate).is_some());
        self.add(T::blank(id.clone()))?;
        Ok(id)
    }

    /// Replaces the item `id` with a copy carrying `value` in `field`. Returns `false` and
    /// schedules nothing for an unknown id.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] outside [`DraftPhase::Ready`].
    pub fn update(
        &mut self,
        id: &str,
        field: T::Field,
        value: impl Into<String>,
    ) -> Result<bool, DraftError> {
        self.ensure_ready()?;
        let Some(position) = self.items.iter().position(|item| item.id() == id) else {
            return Ok(false);
        };
        let updated = self.items[position].with_field(field, value.into());
        self.items[position] = updated;
        self.changed();
        Ok(true)
    }

    /// Removes the item `id`. Returns `false` and schedules nothing for an unknown id.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] outside [`DraftPhase::Ready`].
    pub fn remove(&mut self, id: &str) -> Result<bool, DraftError> {
        self.ensure_ready()?;
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() == before {
            return Ok(false);
        }
        self.changed();
        Ok(true)
    }

    /// Empties the list and deletes the key now, dropping any pending write. Returns whether the
    /// key is absent afterwards.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] outside [`DraftPhase::Ready`].
    pub fn clear(&mut self) -> Result<bool, DraftError> {
        self.ensure_ready()?;
        self.writer.cancel();
        self.items.clear();
        Ok(persistence::remove(&*self.storage, &self.key))
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
        if self.flush() {
            logging::log!("flushed pending draft `{}` on dispose", self.key);
        }
        self.phase = DraftPhase::Disposed;
    }
}
