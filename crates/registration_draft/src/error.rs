use thiserror::Error;

use crate::{phase::DraftPhase, validation::FieldError};

#[derive(Debug, Error, Clone, PartialEq)]
/// Failures surfaced by draft operations. Storage failures are not errors here: they are logged
/// and reported as `false` by the persistence primitives.
pub enum DraftError {
    /// A mutation arrived before hydration finished or after disposal.
    #[error("draft `{key}` is not ready (phase {phase:?})")]
    NotReady {
        /// Storage key of the store.
        key: String,
        /// Phase the store was in.
        phase: DraftPhase,
    },
    /// An item with the same id already exists in the collection.
    #[error("draft `{key}` already contains an item with id `{id}`")]
    DuplicateId {
        /// Storage key of the store.
        key: String,
        /// Conflicting item id.
        id: String,
    },
    /// A selected image failed type or size validation; nothing was changed.
    #[error("{0}")]
    ImageRejected(String),
    /// Decoding or re-encoding a selected image failed; the user may retry.
    #[error("{0}")]
    ImageProcessing(String),
    /// The main form has invalid fields.
    #[error("registration has {} invalid field(s)", .0.len())]
    Validation(Vec<FieldError>),
}
