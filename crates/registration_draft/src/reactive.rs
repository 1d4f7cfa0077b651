//! Leptos bindings for a [`DraftSession`].
//!
//! The session itself is plain `Rc<RefCell<_>>` state; the handle adds two signals so views can
//! react to it: `ready` flips once hydration lands and `revision` bumps after every change made
//! through the handle.

use std::{
    cell::RefCell,
    future::Future,
    rc::{Rc, Weak},
};

use draft_host::{DraftHostServices, DraftNotice, ImageCandidate, NoticeSink};
use leptos::*;

use crate::{
    config::DraftConfig,
    error::DraftError,
    profile_image::validate_candidate,
    session::{upload_profile_image, DraftSession},
};

/// Reactive handle to a shared [`DraftSession`]. Cheap to clone.
#[derive(Clone)]
pub struct DraftSessionHandle {
    session: Rc<RefCell<DraftSession>>,
    ready: RwSignal<bool>,
    revision: RwSignal<u64>,
}

impl DraftSessionHandle {
    /// Wraps `session`. Must run inside a reactive runtime.
    pub fn new(session: DraftSession) -> Self {
        let ready = create_rw_signal(session.is_ready());
        Self {
            session: Rc::new(RefCell::new(session)),
            ready,
            revision: create_rw_signal(0),
        }
    }

    /// Whether hydration finished (tracked).
    pub fn ready(&self) -> bool {
        self.ready.get()
    }

    /// Change counter (tracked).
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Shared session state, for async work such as [`upload_profile_image`].
    pub fn session(&self) -> Rc<RefCell<DraftSession>> {
        self.session.clone()
    }

    /// Reads the session and subscribes the caller to later changes.
    pub fn with<R>(&self, read: impl FnOnce(&DraftSession) -> R) -> R {
        self.revision.with(|_| ());
        read(&self.session.borrow())
    }

    /// Mutates the session and notifies subscribers.
    pub fn update<R>(&self, edit: impl FnOnce(&mut DraftSession) -> R) -> R {
        let out = edit(&mut self.session.borrow_mut());
        self.sync();
        out
    }

    /// Hydrates synchronously and publishes readiness.
    pub fn hydrate(&self) -> bool {
        let applied = self.session.borrow_mut().hydrate();
        self.sync();
        applied
    }

    /// Runs the image upload pipeline and publishes the result.
    ///
    /// # Errors
    ///
    /// See [`upload_profile_image`].
    pub async fn upload_profile_image(
        &self,
        candidate: ImageCandidate,
        data_url: String,
    ) -> Result<bool, DraftError> {
        let result = upload_profile_image(&self.session, candidate, data_url).await;
        self.sync();
        result
    }

    /// Reads a file chosen in an `<input type="file">` and runs it through
    /// [`DraftSessionHandle::upload_profile_image`]. The type and size checks run before the
    /// file is read.
    ///
    /// # Errors
    ///
    /// See [`upload_profile_image`]; a failed read is an [`DraftError::ImageProcessing`].
    pub async fn upload_file(&self, file: web_sys::File) -> Result<bool, DraftError> {
        let candidate = draft_host_web::image_candidate(&file);
        let (config, notices) = {
            let session = self.session.borrow();
            (session.config().clone(), session.services().notices.clone())
        };
        if let Err(err) = validate_candidate(&candidate, &config) {
            notices.notify(DraftNotice::error(err.to_string()));
            return Err(err);
        }
        match draft_host_web::read_file_as_data_url(&file).await {
            Ok(data_url) => self.upload_profile_image(candidate, data_url).await,
            Err(err) => {
                logging::warn!("profile image read failed: {err}");
                let err = DraftError::ImageProcessing(
                    "Failed to read the image file. Please try again.".to_string(),
                );
                notices.notify(DraftNotice::error(err.to_string()));
                Err(err)
            }
        }
    }

    fn sync(&self) {
        let ready = self.session.borrow().is_ready();
        if self.ready.get_untracked() != ready {
            self.ready.try_set(ready);
        }
        self.revision.try_update(|revision| *revision += 1);
    }

    fn hydration_task(&self) -> impl Future<Output = ()> + 'static {
        let session: Weak<RefCell<DraftSession>> = Rc::downgrade(&self.session);
        let ready = self.ready;
        let revision = self.revision;
        async move {
            let Some(session) = session.upgrade() else {
                return;
            };
            let loaded = session.borrow().load_persisted();
            if !session.borrow_mut().complete_hydration(loaded) {
                return;
            }
            ready.try_set(true);
            revision.try_update(|revision| *revision += 1);
        }
    }
}

/// Creates a session for the current component, hydrates it in the background, and flushes it
/// when the component is cleaned up.
pub fn use_draft_session(config: DraftConfig, services: DraftHostServices) -> DraftSessionHandle {
    let handle = DraftSessionHandle::new(DraftSession::new(config, services));
    handle.session.borrow_mut().begin_hydration();
    spawn_local(handle.hydration_task());
    on_cleanup({
        let session = handle.session.clone();
        move || session.borrow_mut().dispose()
    });
    handle
}

/// [`use_draft_session`] over the host services selected for this build.
pub fn use_browser_draft_session(
    config: DraftConfig,
    notices: Rc<dyn NoticeSink>,
) -> DraftSessionHandle {
    use_draft_session(config, draft_host_web::build_host_services(notices))
}
