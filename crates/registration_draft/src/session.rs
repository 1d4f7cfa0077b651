//! The composed registration draft.
//!
//! A [`DraftSession`] owns one store per storage key: the main form, the guest list, the
//! children list, and the profile image. Each key is written independently, so after a crash
//! the keys may reflect slightly different moments; every key is still internally consistent.

use std::{cell::RefCell, rc::Rc};

use draft_host::{DraftHostServices, DraftNotice, ImageCandidate};
use leptos::logging;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    collection::CollectionDraftStore,
    config::DraftConfig,
    error::DraftError,
    model::{Child, ChildField, FormField, Guest, GuestField, RegistrationForm},
    phase::DraftPhase,
    profile_image::{prepare_profile_image, ProfileImageSlot},
    scalar::{HydrationPolicy, ScalarDraftStore},
    validation::validate_form,
};

const IMAGE_SAVE_FAILED_MESSAGE: &str =
    "Image could not be saved locally. It will be lost if you leave this page.";

/// Everything a session reads from storage during hydration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedDraft {
    /// Stored form JSON.
    pub form: Option<Value>,
    /// Stored guest list.
    pub guests: Option<Vec<Guest>>,
    /// Stored children list.
    pub children: Option<Vec<Child>>,
    /// Stored profile image.
    pub profile_image: Option<String>,
}

/// What the confirmation step shows before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReview {
    /// Main form values.
    pub form: RegistrationForm,
    /// Complete guests only.
    pub guests: Vec<Guest>,
    /// Complete children only.
    pub children: Vec<Child>,
    /// Whether a profile image is attached.
    pub has_profile_image: bool,
}

/// Submitted registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSubmission {
    /// Main form values, flattened into the payload.
    #[serde(flatten)]
    pub form: RegistrationForm,
    /// Complete guests.
    pub guests: Vec<Guest>,
    /// Complete children.
    #[serde(rename = "kids")]
    pub children: Vec<Child>,
    /// Whether a profile image was attached.
    pub profile_image: bool,
    /// Submission time as unix milliseconds.
    pub submitted_at: u64,
}

/// An in-progress registration backed by host storage.
#[derive(Debug)]
pub struct DraftSession {
    config: DraftConfig,
    services: DraftHostServices,
    form: ScalarDraftStore<RegistrationForm>,
    guests: CollectionDraftStore<Guest>,
    children: CollectionDraftStore<Child>,
    profile_image: ProfileImageSlot,
}

impl DraftSession {
    /// Creates an unhydrated session over `services` using the keys from `config`.
    pub fn new(config: DraftConfig, services: DraftHostServices) -> Self {
        if let Err(err) = config.check() {
            logging::warn!("draft configuration problem: {err}");
        }
        let form = ScalarDraftStore::new(
            config.form_key.clone(),
            RegistrationForm::default(),
            HydrationPolicy::MergeWithDefaults,
            services.storage.clone(),
            services.scheduler.clone(),
            services.notices.clone(),
            config.debounce_ms,
        );
        let guests = CollectionDraftStore::new(
            config.guests_key.clone(),
            Vec::new(),
            services.storage.clone(),
            services.scheduler.clone(),
            services.notices.clone(),
            config.debounce_ms,
        );
        let children = CollectionDraftStore::new(
            config.children_key.clone(),
            Vec::new(),
            services.storage.clone(),
            services.scheduler.clone(),
            services.notices.clone(),
            config.debounce_ms,
        );
        let profile_image =
            ProfileImageSlot::new(config.profile_image_key.clone(), services.storage.clone());
        Self {
            config,
            services,
            form,
            guests,
            children,
            profile_image,
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &DraftConfig {
        &self.config
    }

    /// Host services in use.
    pub fn services(&self) -> &DraftHostServices {
        &self.services
    }

    /// Moves every store to hydrating. Returns `false` if the session was already started.
    pub fn begin_hydration(&mut self) -> bool {
        let form = self.form.begin_hydration();
        let guests = self.guests.begin_hydration();
        let children = self.children.begin_hydration();
        let image = self.profile_image.begin_hydration();
        form && guests && children && image
    }

    /// Reads all four keys.
    pub fn load_persisted(&self) -> PersistedDraft {
        PersistedDraft {
            form: self.form.load_persisted(),
            guests: self.guests.load_persisted(),
            children: self.children.load_persisted(),
            profile_image: self.profile_image.load_persisted(),
        }
    }

    /// Applies a hydration result to every store. Returns `false` when the result arrived too
    /// late (after disposal) and was dropped.
    pub fn complete_hydration(&mut self, loaded: PersistedDraft) -> bool {
        if !matches!(self.form.phase(), DraftPhase::Uninitialized | DraftPhase::Hydrating) {
            return false;
        }
        self.form.complete_hydration(loaded.form);
        self.guests.complete_hydration(loaded.guests);
        self.children.complete_hydration(loaded.children);
        self.profile_image.complete_hydration(loaded.profile_image);
        true
    }

    /// Synchronous hydration of every store.
    pub fn hydrate(&mut self) -> bool {
        self.begin_hydration();
        let loaded = self.load_persisted();
        self.complete_hydration(loaded)
    }

    /// Returns whether every store finished hydrating.
    pub fn is_ready(&self) -> bool {
        self.form.is_ready()
            && self.guests.is_ready()
            && self.children.is_ready()
            && self.profile_image.phase().is_ready()
    }

    /// Current form values.
    pub fn form(&self) -> &RegistrationForm {
        self.form.value()
    }

    /// Current guests, including incomplete ones.
    pub fn guests(&self) -> &[Guest] {
        self.guests.items()
    }

    /// Current children, including incomplete ones.
    pub fn children(&self) -> &[Child] {
        self.children.items()
    }

    /// Current profile image data URL.
    pub fn profile_image(&self) -> Option<&str> {
        self.profile_image.image()
    }

    /// Returns whether any store has a debounced write waiting.
    pub fn has_pending_writes(&self) -> bool {
        self.form.has_pending_write()
            || self.guests.has_pending_write()
            || self.children.has_pending_write()
    }

    /// Sets one form field.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] before hydration or after disposal.
    pub fn set_field(
        &mut self,
        field: FormField,
        value: impl Into<String>,
    ) -> Result<(), DraftError> {
        let value = value.into();
        self.form.modify(|form| form.set(field, value))
    }

    /// Replaces the whole form.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] before hydration or after disposal.
    pub fn set_form(&mut self, form: RegistrationForm) -> Result<(), DraftError> {
        self.form.set(form)
    }

    /// Appends a blank guest and returns its id.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] before hydration or after disposal.
    pub fn add_guest(&mut self) -> Result<String, DraftError> {
        self.guests.add_blank()
    }

    /// Updates one field of guest `id`; `false` for an unknown id.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] before hydration or after disposal.
    pub fn update_guest(
        &mut self,
        id: &str,
        field: GuestField,
        value: impl Into<String>,
    ) -> Result<bool, DraftError> {
        self.guests.update(id, field, value)
    }

    /// Removes guest `id`; `false` for an unknown id.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] before hydration or after disposal.
    pub fn remove_guest(&mut self, id: &str) -> Result<bool, DraftError> {
        self.guests.remove(id)
    }

    /// Appends a blank child and returns its id.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] before hydration or after disposal.
    pub fn add_child(&mut self) -> Result<String, DraftError> {
        self.children.add_blank()
    }

    /// Updates one field of child `id`; `false` for an unknown id.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] before hydration or after disposal.
    pub fn update_child(
        &mut self,
        id: &str,
        field: ChildField,
        value: impl Into<String>,
    ) -> Result<bool, DraftError> {
        self.children.update(id, field, value)
    }

    /// Removes child `id`; `false` for an unknown id.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] before hydration or after disposal.
    pub fn remove_child(&mut self, id: &str) -> Result<bool, DraftError> {
        self.children.remove(id)
    }

    /// Stores an already prepared image and announces the outcome. Returns whether the write
    /// succeeded; a refused write keeps the image for this page only.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] before hydration or after disposal.
    pub fn set_profile_image(&mut self, image: String) -> Result<bool, DraftError> {
        let written = self.profile_image.set(image)?;
        let notice = if written {
            DraftNotice::success("Profile image uploaded successfully.")
        } else {
            DraftNotice::error(IMAGE_SAVE_FAILED_MESSAGE)
        };
        self.services.notices.notify(notice);
        Ok(written)
    }

    /// Removes the image and its key, and announces it.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] before hydration or after disposal.
    pub fn remove_profile_image(&mut self) -> Result<bool, DraftError> {
        let removed = self.profile_image.remove()?;
        self.services
            .notices
            .notify(DraftNotice::success("Profile image removed successfully."));
        Ok(removed)
    }

    /// Checks the form against the submission rules.
    ///
    /// # Errors
    ///
    /// [`DraftError::Validation`] listing every failing field.
    pub fn validate(&self) -> Result<(), DraftError> {
        let errors = validate_form(self.form.value());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(DraftError::Validation(errors))
        }
    }

    /// Builds the confirmation view: incomplete list entries are left out.
    pub fn review(&self) -> RegistrationReview {
        RegistrationReview {
            form: self.form.value().clone(),
            guests: self.guests.valid_items(),
            children: self.children.valid_items(),
            has_profile_image: self.profile_image.has_image(),
        }
    }

    /// Validates and submits the registration.
    ///
    /// The payload is logged; delivery to a backend is out of scope. The draft is kept so the
    /// user can still edit or clear it.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] before hydration and [`DraftError::Validation`] for invalid
    /// fields.
    pub fn submit(&self, submitted_at: u64) -> Result<RegistrationSubmission, DraftError> {
        if !self.is_ready() {
            return Err(DraftError::NotReady {
                key: self.config.form_key.clone(),
                phase: self.form.phase(),
            });
        }
        self.validate()?;
        let review = self.review();
        let submission = RegistrationSubmission {
            form: review.form,
            guests: review.guests,
            children: review.children,
            profile_image: review.has_profile_image,
            submitted_at,
        };
        match serde_json::to_string(&submission) {
            Ok(payload) => logging::log!("{payload}"),
            Err(err) => logging::warn!("could not serialize submission: {err}"),
        }
        self.services.notices.notify(DraftNotice::new(
            "Form submitted",
            "Your registration has been submitted successfully.",
        ));
        Ok(submission)
    }

    /// Resets the form, empties both lists, drops the image, and deletes all four keys.
    /// Returns whether every key is absent afterwards.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] before hydration or after disposal.
    pub fn clear_all(&mut self) -> Result<bool, DraftError> {
        if !self.is_ready() {
            return Err(DraftError::NotReady {
                key: self.config.form_key.clone(),
                phase: self.form.phase(),
            });
        }
        self.form.reset_to(RegistrationForm::default());
        let form = self.form.clear_storage();
        let guests = self.guests.clear()?;
        let children = self.children.clear()?;
        let image = self.profile_image.remove()?;
        let cleared = form && guests && children && image;
        let notice = if cleared {
            DraftNotice::success("All form data has been cleared.")
        } else {
            DraftNotice::error("Some saved form data could not be removed from this device.")
        };
        self.services.notices.notify(notice);
        Ok(cleared)
    }

    /// Writes every pending change now. Returns whether anything was written.
    pub fn flush(&self) -> bool {
        let form = self.form.flush();
        let guests = self.guests.flush();
        let children = self.children.flush();
        form || guests || children
    }

    /// Flushes pending writes and disposes every store.
    pub fn dispose(&mut self) {
        self.form.dispose();
        self.guests.dispose();
        self.children.dispose();
        self.profile_image.dispose();
    }
}

/// Validates, downscales, and stores a selected image, then announces the outcome.
///
/// No session borrow is held while the compressor runs, so the session stays usable; a session
/// disposed meanwhile rejects the result.
///
/// # Errors
///
/// [`DraftError::ImageRejected`] or [`DraftError::ImageProcessing`] (both also raised as error
/// notices), or [`DraftError::NotReady`] when the session is not accepting changes.
pub async fn upload_profile_image(
    session: &Rc<RefCell<DraftSession>>,
    candidate: ImageCandidate,
    data_url: String,
) -> Result<bool, DraftError> {
    let (config, services) = {
        let session = session.borrow();
        (session.config.clone(), session.services.clone())
    };
    match prepare_profile_image(&candidate, &data_url, &*services.compressor, &config).await {
        Ok(image) => session.borrow_mut().set_profile_image(image),
        Err(err) => {
            services.notices.notify(DraftNotice::error(err.to_string()));
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use draft_host::{
        ImageCompressor, ImageError, ImageFuture, ManualScheduler, MemoryDraftStorage,
        MemoryNoticeSink, NoticeVariant,
    };
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{persistence::SAVE_FAILED_MESSAGE, validation::FieldError};

    const SMALL_JPEG: &str = "data:image/jpeg;base64,c21hbGw=";

    struct FixedCompressor;

    impl ImageCompressor for FixedCompressor {
        fn compress<'a>(
            &'a self,
            _data_url: &'a str,
            _max_width: u32,
            _quality: f64,
        ) -> ImageFuture<'a, Result<String, ImageError>> {
            Box::pin(async { Ok(SMALL_JPEG.to_string()) })
        }
    }

    struct Harness {
        storage: MemoryDraftStorage,
        scheduler: ManualScheduler,
        notices: MemoryNoticeSink,
        config: DraftConfig,
    }

    impl Harness {
        fn new(prefix: &str) -> Self {
            Self {
                storage: MemoryDraftStorage::default(),
                scheduler: ManualScheduler::default(),
                notices: MemoryNoticeSink::default(),
                config: DraftConfig::with_key_prefix(prefix),
            }
        }

        fn with_quota(prefix: &str, quota_bytes: usize) -> Self {
            Self {
                storage: MemoryDraftStorage::with_quota(quota_bytes),
                ..Self::new(prefix)
            }
        }

        fn session(&self) -> DraftSession {
            let services =
                DraftHostServices::headless(self.storage.clone(), self.scheduler.clone())
                    .with_compressor(Rc::new(FixedCompressor))
                    .with_notices(Rc::new(self.notices.clone()));
            DraftSession::new(self.config.clone(), services)
        }

        fn stored(&self, key: &str) -> Option<Value> {
            self.storage
                .raw(key)
                .map(|raw| serde_json::from_str(&raw).expect("stored json"))
        }
    }

    fn fill_valid_form(session: &mut DraftSession) {
        for (field, value) in [
            (FormField::NameEnglish, "Rahim Uddin"),
            (FormField::MobileNumber, "01712345678"),
            (FormField::Email, "rahim@example.com"),
            (FormField::PresentAddress, "12 Lake Road"),
            (FormField::PermanentAddress, "Village Road"),
        ] {
            session.set_field(field, value).expect("set field");
        }
    }

    #[test]
    fn fresh_session_hydrates_to_defaults_without_writing() {
        let harness = Harness::new("fresh");
        let mut session = harness.session();
        assert!(!session.is_ready());
        assert!(session.hydrate());
        assert!(session.is_ready());
        assert_eq!(session.form(), &RegistrationForm::default());
        assert!(session.guests().is_empty());
        assert_eq!(harness.storage.keys(), Vec::<String>::new());
        assert_eq!(harness.scheduler.pending_count(), 0);
    }

    #[test]
    fn edits_survive_a_reload() {
        let harness = Harness::new("reload");
        let mut session = harness.session();
        session.hydrate();

        session.set_field(FormField::NameEnglish, "Karim").expect("set name");
        let guest = session.add_guest().expect("add guest");
        session.update_guest(&guest, GuestField::Name, "Alice").expect("update guest");
        let child = session.add_child().expect("add child");
        session.update_child(&child, ChildField::Age, "7").expect("update child");
        harness.scheduler.advance(500);

        let mut reloaded = harness.session();
        reloaded.hydrate();
        assert_eq!(reloaded.form().name_english, "Karim");
        assert_eq!(reloaded.guests()[0].id, guest);
        assert_eq!(reloaded.guests()[0].name, "Alice");
        assert_eq!(reloaded.children()[0].age, "7");
    }

    #[test]
    fn stored_form_from_an_older_schema_keeps_new_field_defaults() {
        let harness = Harness::new("drift");
        harness.storage.insert_raw(
            harness.config.form_key.clone(),
            json!({"nameEnglish": "Old Record", "email": "old@example.com"}).to_string(),
        );
        let mut session = harness.session();
        session.hydrate();
        assert_eq!(session.form().name_english, "Old Record");
        assert_eq!(session.form().email, "old@example.com");
        assert_eq!(session.form().remarks, "");
    }

    #[test]
    fn mutations_before_hydration_are_rejected() {
        let harness = Harness::new("early");
        let mut session = harness.session();
        assert!(matches!(
            session.set_field(FormField::Gender, "Female"),
            Err(DraftError::NotReady { .. })
        ));
        assert!(session.add_guest().is_err());
        assert!(session.submit(0).is_err());
    }

    #[test]
    fn review_lists_only_complete_entries() {
        let harness = Harness::new("review");
        let mut session = harness.session();
        session.hydrate();

        let complete = session.add_guest().expect("add");
        for (field, value) in [
            (GuestField::Name, "Alice"),
            (GuestField::Age, "30"),
            (GuestField::Relation, "Sister"),
        ] {
            session.update_guest(&complete, field, value).expect("update");
        }
        session.add_guest().expect("add blank");
        session.add_child().expect("add blank child");

        let review = session.review();
        assert_eq!(review.guests.len(), 1);
        assert_eq!(review.guests[0].id, complete);
        assert!(review.children.is_empty());
        assert!(!review.has_profile_image);
        assert_eq!(session.guests().len(), 2);
    }

    #[test]
    fn submit_requires_valid_fields() {
        let harness = Harness::new("invalid");
        let mut session = harness.session();
        session.hydrate();
        session.set_field(FormField::NameEnglish, "R").expect("set name");

        let Err(DraftError::Validation(errors)) = session.submit(1) else {
            panic!("expected validation errors");
        };
        assert_eq!(
            errors[0],
            FieldError {
                field: FormField::NameEnglish,
                message: "Name must be at least 2 characters.".to_string(),
            }
        );
        assert!(harness.notices.notices().is_empty());
    }

    #[test]
    fn submit_builds_flat_payload_and_announces_it() {
        let harness = Harness::new("submit");
        let mut session = harness.session();
        session.hydrate();
        fill_valid_form(&mut session);
        session.add_guest().expect("blank guest");
        session.set_profile_image(SMALL_JPEG.to_string()).expect("image");
        harness.notices.take();

        let submission = session.submit(1_700_000_000_000).expect("submit");
        let payload = serde_json::to_value(&submission).expect("payload");
        assert_eq!(payload["nameEnglish"], json!("Rahim Uddin"));
        assert_eq!(payload["guests"], json!([]));
        assert_eq!(payload["kids"], json!([]));
        assert_eq!(payload["profileImage"], json!(true));
        assert_eq!(payload["submittedAt"], json!(1_700_000_000_000_u64));
        assert_eq!(
            harness.notices.take(),
            vec![DraftNotice::new(
                "Form submitted",
                "Your registration has been submitted successfully."
            )]
        );
    }

    #[test]
    fn clear_all_resets_everything_and_removes_every_key() {
        let harness = Harness::new("clear");
        let mut session = harness.session();
        session.hydrate();
        fill_valid_form(&mut session);
        session.add_guest().expect("guest");
        session.add_child().expect("child");
        session.set_profile_image(SMALL_JPEG.to_string()).expect("image");
        harness.scheduler.advance(500);
        assert_eq!(harness.storage.keys().len(), 4);

        session.set_field(FormField::Remarks, "pending").expect("edit");
        assert!(session.clear_all().expect("clear"));
        harness.scheduler.advance(1_000);

        assert_eq!(harness.storage.keys(), Vec::<String>::new());
        assert_eq!(session.form(), &RegistrationForm::default());
        assert!(session.guests().is_empty());
        assert!(session.children().is_empty());
        assert_eq!(session.profile_image(), None);
        assert_eq!(
            harness.notices.notices().last(),
            Some(&DraftNotice::success("All form data has been cleared."))
        );
    }

    #[test]
    fn dispose_flushes_and_blocks_late_hydration() {
        let harness = Harness::new("dispose");
        let mut session = harness.session();
        session.hydrate();
        session.set_field(FormField::Occupation, "Engineer").expect("set");
        assert!(session.has_pending_writes());

        session.dispose();
        assert_eq!(
            harness.stored(&harness.config.form_key).map(|form| form["occupation"].clone()),
            Some(json!("Engineer"))
        );
        assert!(!session.complete_hydration(PersistedDraft::default()));
        assert_eq!(session.form().occupation, "Engineer");
    }

    #[test]
    fn disposal_during_hydration_drops_the_result() {
        let harness = Harness::new("torn");
        harness
            .storage
            .insert_raw(harness.config.guests_key.clone(), "[]");
        let mut session = harness.session();
        assert!(session.begin_hydration());
        let loaded = session.load_persisted();
        session.dispose();
        assert!(!session.complete_hydration(loaded));
        assert!(!session.is_ready());
        assert_eq!(harness.storage.keys(), vec![harness.config.guests_key.clone()]);
    }

    #[test]
    fn upload_stores_compressed_image_and_announces_success() {
        let harness = Harness::new("upload");
        let session = Rc::new(RefCell::new(harness.session()));
        session.borrow_mut().hydrate();

        let written = block_on(upload_profile_image(
            &session,
            ImageCandidate::new("image/png", 1_024),
            "data:image/png;base64,aGVsbG8=".to_string(),
        ))
        .expect("upload");
        assert!(written);
        assert_eq!(session.borrow().profile_image(), Some(SMALL_JPEG));
        assert_eq!(
            harness.stored(&harness.config.profile_image_key),
            Some(json!(SMALL_JPEG))
        );
        assert_eq!(
            harness.notices.take(),
            vec![DraftNotice::success("Profile image uploaded successfully.")]
        );
    }

    #[test]
    fn rejected_upload_changes_nothing_and_reports_error() {
        let harness = Harness::new("reject");
        let session = Rc::new(RefCell::new(harness.session()));
        session.borrow_mut().hydrate();

        let result = block_on(upload_profile_image(
            &session,
            ImageCandidate::new("image/png", 6 * 1024 * 1024),
            "data:image/png;base64,aGVsbG8=".to_string(),
        ));
        assert!(matches!(result, Err(DraftError::ImageRejected(_))));
        assert_eq!(session.borrow().profile_image(), None);
        assert!(!harness.storage.contains_key(&harness.config.profile_image_key));

        let notices = harness.notices.take();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].variant, NoticeVariant::Destructive);
        assert_eq!(
            notices[0].description,
            "File too large. Image size should be less than 5MB."
        );
    }

    #[test]
    fn removing_the_image_deletes_its_key() {
        let harness = Harness::new("remove_image");
        let mut session = harness.session();
        session.hydrate();
        session.set_profile_image(SMALL_JPEG.to_string()).expect("image");
        assert!(session.remove_profile_image().expect("remove"));
        assert!(!harness.storage.contains_key(&harness.config.profile_image_key));
        assert_eq!(session.form.phase(), DraftPhase::Ready);
    }

    #[test]
    fn image_refused_by_storage_is_reported_not_announced() {
        let harness = Harness::with_quota("quota", 16);
        let mut session = harness.session();
        session.hydrate();

        let written = session
            .set_profile_image(SMALL_JPEG.to_string())
            .expect("image");
        assert!(!written);
        assert_eq!(session.profile_image(), Some(SMALL_JPEG));
        assert!(!harness.storage.contains_key(&harness.config.profile_image_key));
        assert_eq!(
            harness.notices.take(),
            vec![DraftNotice::error(IMAGE_SAVE_FAILED_MESSAGE)]
        );
    }

    #[test]
    fn refused_debounced_write_reaches_the_notice_sink() {
        let harness = Harness::with_quota("full", 16);
        let mut session = harness.session();
        session.hydrate();

        session.set_field(FormField::NameEnglish, "Rahim").expect("set");
        harness.scheduler.advance(500);
        assert!(!harness.storage.contains_key(&harness.config.form_key));
        assert_eq!(session.form().name_english, "Rahim");
        assert_eq!(
            harness.notices.take(),
            vec![DraftNotice::error(SAVE_FAILED_MESSAGE)]
        );
    }
}
