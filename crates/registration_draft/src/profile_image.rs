//! Profile image slot and upload pipeline.
//!
//! The image is kept under its own key and written immediately rather than debounced: it changes
//! rarely and a single write is large.

use std::{fmt, rc::Rc};

use draft_host::{clamp_quality, DraftStorage, ImageCandidate, ImageCompressor};
use leptos::logging;

use crate::{config::DraftConfig, error::DraftError, persistence, phase::DraftPhase};

const READ_FAILED_MESSAGE: &str = "Failed to read the image file. Please try again.";
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Persisted optional profile image, held as a data URL.
pub struct ProfileImageSlot {
    key: String,
    image: Option<String>,
    phase: DraftPhase,
    storage: Rc<dyn DraftStorage>,
}

impl fmt::Debug for ProfileImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileImageSlot")
            .field("key", &self.key)
            .field("phase", &self.phase)
            .field("has_image", &self.image.is_some())
            .finish()
    }
}

impl ProfileImageSlot {
    /// Creates an empty, unhydrated slot over `key`.
    pub fn new(key: impl Into<String>, storage: Rc<dyn DraftStorage>) -> Self {
        Self {
            key: key.into(),
            image: None,
            phase: DraftPhase::Uninitialized,
            storage,
        }
    }

    /// Storage key of this slot.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> DraftPhase {
        self.phase
    }

    /// Current image data URL.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Returns whether an image is set.
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Marks the storage read as in flight.
    pub fn begin_hydration(&mut self) -> bool {
        if self.phase != DraftPhase::Uninitialized {
            return false;
        }
        self.phase = DraftPhase::Hydrating;
        true
    }

    /// Reads the stored image. A bare `data:` URL written without JSON quoting is accepted too.
    pub fn load_persisted(&self) -> Option<String> {
        let raw = match self.storage.load_raw(&self.key) {
            Ok(raw) => raw?,
            Err(err) => {
                logging::warn!("Error retrieving {} from storage: {err}", self.key);
                return None;
            }
        };
        match serde_json::from_str::<Option<String>>(&raw) {
            Ok(image) => image.filter(|image| !image.is_empty()),
            Err(_) if raw.starts_with("data:") => Some(raw),
            Err(err) => {
                logging::warn!("Discarding stored profile image `{}`: {err}", self.key);
                None
            }
        }
    }

    /// Applies a hydration result; late results are dropped.
    pub fn complete_hydration(&mut self, loaded: Option<String>) -> bool {
        if !matches!(self.phase, DraftPhase::Uninitialized | DraftPhase::Hydrating) {
            return false;
        }
        self.image = loaded;
        self.phase = DraftPhase::Ready;
        true
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

    /// Sets the image and writes it now. Returns whether the write succeeded; the in-memory
    /// image is kept either way.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] outside [`DraftPhase::Ready`].
    pub fn set(&mut self, image: String) -> Result<bool, DraftError> {
        self.ensure_ready()?;
        let written = persistence::set(&*self.storage, &self.key, &image);
        self.image = Some(image);
        Ok(written)
    }

    /// Clears the image and deletes the key. Returns whether the key is absent afterwards.
    ///
    /// # Errors
    ///
    /// [`DraftError::NotReady`] outside [`DraftPhase::Ready`].
    pub fn remove(&mut self) -> Result<bool, DraftError> {
        self.ensure_ready()?;
        self.image = None;
        Ok(persistence::remove(&*self.storage, &self.key))
    }

    /// Stops accepting changes. Writes are never pending, so nothing is flushed.
    pub fn dispose(&mut self) {
        self.phase = DraftPhase::Disposed;
    }
}

/// Checks a selected file's type and size before it is read.
///
/// # Errors
///
/// [`DraftError::ImageRejected`] with the user-facing reason.
pub fn validate_candidate(
    candidate: &ImageCandidate,
    config: &DraftConfig,
) -> Result<(), DraftError> {
    if !config.accepts_image_type(&candidate.mime_type) {
        return Err(DraftError::ImageRejected(
            "Invalid file type. Please select a JPEG, PNG, or GIF image.".to_string(),
        ));
    }
    if candidate.size_bytes > config.max_image_bytes {
        let limit_mb = config.max_image_bytes as f64 / BYTES_PER_MB;
        return Err(DraftError::ImageRejected(format!(
            "File too large. Image size should be less than {limit_mb}MB."
        )));
    }
    Ok(())
}

/// Validates and downscales a selected image, returning the data URL to store.
///
/// Nothing is stored here; on any error the caller's state stays as it was.
///
/// # Errors
///
/// [`DraftError::ImageRejected`] when validation fails and [`DraftError::ImageProcessing`]
/// when the compressor fails.
pub async fn prepare_profile_image(
    candidate: &ImageCandidate,
    data_url: &str,
    compressor: &dyn ImageCompressor,
    config: &DraftConfig,
) -> Result<String, DraftError> {
    validate_candidate(candidate, config)?;
    compressor
        .compress(
            data_url,
            config.image_max_width,
            clamp_quality(config.image_quality),
        )
        .await
        .map_err(|err| {
            logging::warn!("profile image processing failed: {err}");
            DraftError::ImageProcessing(READ_FAILED_MESSAGE.to_string())
        })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use draft_host::{ImageError, ImageFuture, MemoryDraftStorage, NoopImageCompressor};
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    const KEY: &str = "test_profile_image";
    const PNG: &str = "data:image/png;base64,aGVsbG8=";
    const JPEG: &str = "data:image/jpeg;base64,c21hbGw=";

    #[derive(Default)]
    struct RecordingCompressor {
        calls: RefCell<Vec<(String, u32, f64)>>,
    }

    impl ImageCompressor for RecordingCompressor {
        fn compress<'a>(
            &'a self,
            data_url: &'a str,
            max_width: u32,
            quality: f64,
        ) -> ImageFuture<'a, Result<String, ImageError>> {
            self.calls
                .borrow_mut()
                .push((data_url.to_string(), max_width, quality));
            Box::pin(async { Ok(JPEG.to_string()) })
        }
    }

    fn slot(storage: &MemoryDraftStorage) -> ProfileImageSlot {
        ProfileImageSlot::new(KEY, Rc::new(storage.clone()))
    }

    #[test]
    fn set_writes_immediately_and_remove_deletes_key() {
        let storage = MemoryDraftStorage::default();
        let mut image = slot(&storage);
        image.hydrate();

        assert!(image.set(JPEG.to_string()).expect("set"));
        assert_eq!(storage.raw(KEY), Some(format!("\"{JPEG}\"")));
        assert!(image.has_image());

        assert!(image.remove().expect("remove"));
        assert!(!storage.contains_key(KEY));
        assert_eq!(image.image(), None);
    }

    #[test]
    fn hydration_restores_json_and_bare_data_urls() {
        let storage = MemoryDraftStorage::default();
        storage.insert_raw(KEY, format!("\"{JPEG}\""));
        let mut image = slot(&storage);
        image.hydrate();
        assert_eq!(image.image(), Some(JPEG));

        let bare = MemoryDraftStorage::default();
        bare.insert_raw(KEY, PNG);
        let mut image = slot(&bare);
        image.hydrate();
        assert_eq!(image.image(), Some(PNG));
    }

    #[test]
    fn unreadable_stored_image_hydrates_empty() {
        let storage = MemoryDraftStorage::default();
        storage.insert_raw(KEY, "{not an image");
        let mut image = slot(&storage);
        assert!(image.hydrate());
        assert!(!image.has_image());
    }

    #[test]
    fn failed_write_keeps_image_in_memory() {
        let storage = MemoryDraftStorage::with_quota(8);
        let mut image = slot(&storage);
        image.hydrate();

        assert!(!image.set(JPEG.to_string()).expect("set"));
        assert_eq!(image.image(), Some(JPEG));
        assert!(!storage.contains_key(KEY));
    }

    #[test]
    fn set_before_hydration_is_rejected() {
        let storage = MemoryDraftStorage::default();
        let mut image = slot(&storage);
        assert!(matches!(
            image.set(JPEG.to_string()),
            Err(DraftError::NotReady { .. })
        ));
    }

    #[test]
    fn rejects_unsupported_types() {
        let config = DraftConfig::default();
        assert_eq!(
            validate_candidate(&ImageCandidate::new("image/webp", 10), &config),
            Err(DraftError::ImageRejected(
                "Invalid file type. Please select a JPEG, PNG, or GIF image.".to_string()
            ))
        );
    }

    #[test]
    fn rejects_files_over_the_size_limit() {
        let config = DraftConfig::default();
        let limit = config.max_image_bytes;
        assert!(validate_candidate(&ImageCandidate::new("image/png", limit), &config).is_ok());
        assert_eq!(
            validate_candidate(&ImageCandidate::new("image/png", limit + 1), &config),
            Err(DraftError::ImageRejected(
                "File too large. Image size should be less than 5MB.".to_string()
            ))
        );
    }

    #[test]
    fn prepare_downscales_with_configured_settings() {
        let compressor = RecordingCompressor::default();
        let config = DraftConfig::default();
        let prepared = block_on(prepare_profile_image(
            &ImageCandidate::new("image/png", 5),
            PNG,
            &compressor,
            &config,
        ))
        .expect("prepare");

        assert_eq!(prepared, JPEG);
        assert_eq!(
            *compressor.calls.borrow(),
            vec![(PNG.to_string(), 800, 0.7)]
        );
    }

    #[test]
    fn prepare_skips_compression_for_rejected_files() {
        let compressor = RecordingCompressor::default();
        let result = block_on(prepare_profile_image(
            &ImageCandidate::new("text/plain", 5),
            "data:,hello",
            &compressor,
            &DraftConfig::default(),
        ));
        assert!(matches!(result, Err(DraftError::ImageRejected(_))));
        assert!(compressor.calls.borrow().is_empty());
    }

    #[test]
    fn compressor_failure_is_retryable_processing_error() {
        let result = block_on(prepare_profile_image(
            &ImageCandidate::new("image/png", 5),
            PNG,
            &NoopImageCompressor,
            &DraftConfig::default(),
        ));
        assert_eq!(
            result,
            Err(DraftError::ImageProcessing(
                "Failed to read the image file. Please try again.".to_string()
            ))
        );
    }
}
