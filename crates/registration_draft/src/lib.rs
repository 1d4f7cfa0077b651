//! Draft persistence and form logic for the alumni registration form.
//!
//! The crate keeps an in-progress registration in the host's key/value storage so it survives
//! reloads:
//!
//! - [`persistence`]: safe get/set/remove primitives that log instead of failing.
//! - [`debounce`]: trailing-edge debouncer over a [`draft_host::TimerScheduler`].
//! - [`collection`]: ordered, id-addressed list drafts (guests, children).
//! - [`scalar`]: single-record drafts (the main form).
//! - [`profile_image`]: the separately stored, downscaled profile image.
//! - [`session`]: the composed registration draft with review and submission.
//! - [`reactive`]: leptos bindings for mounting a session in a component tree.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod collection;
pub mod config;
pub mod debounce;
pub mod error;
pub mod model;
pub mod persistence;
pub mod phase;
pub mod profile_image;
pub mod reactive;
pub mod scalar;
pub mod session;
pub mod validation;

pub use collection::CollectionDraftStore;
pub use config::DraftConfig;
pub use debounce::{debounce, Debouncer};
pub use error::DraftError;
pub use model::{
    valid_items, Child, ChildField, DraftListItem, FormField, Guest, GuestField, RegistrationForm,
};
pub use phase::DraftPhase;
pub use profile_image::{prepare_profile_image, validate_candidate, ProfileImageSlot};
pub use reactive::{use_browser_draft_session, use_draft_session, DraftSessionHandle};
pub use scalar::{HydrationPolicy, ScalarDraftStore};
pub use session::{
    upload_profile_image, DraftSession, PersistedDraft, RegistrationReview,
    RegistrationSubmission,
};
pub use validation::{validate_form, FieldError};
