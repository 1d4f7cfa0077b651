//! Draft store lifecycle.

use serde::{Deserialize, Serialize};

/// Lifecycle of a draft store.
///
/// Writes are armed only in [`DraftPhase::Ready`]; the hydration transition itself never counts
/// as a change, so a store never writes back the data it just read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftPhase {
    /// Constructed; storage not read yet.
    #[default]
    Uninitialized,
    /// Storage read in flight.
    Hydrating,
    /// Hydrated; mutations persist.
    Ready,
    /// Owner torn down; late hydration results and mutations are ignored.
    Disposed,
}

impl DraftPhase {
    /// Returns whether mutations are accepted.
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}
