//! Draft session configuration.

use draft_host::{DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};
use serde::{Deserialize, Serialize};

/// Default key of the main form record.
pub const FORM_KEY: &str = "registration_form_data";
/// Default key of the guest list.
pub const GUESTS_KEY: &str = "registration_form_guests";
/// Default key of the children list.
pub const CHILDREN_KEY: &str = "registration_form_kids";
/// Default key of the profile image.
pub const PROFILE_IMAGE_KEY: &str = "registration_form_profile_image";
/// Default quiet period before a debounced write.
pub const DEFAULT_DEBOUNCE_MS: u32 = 500;
/// Default upper bound for a selected image file.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Storage keys and tuning for one draft session.
///
/// Each store receives its key from here, so tests can isolate sessions with distinct keys.
/// Missing JSON fields fall back to the defaults.
pub struct DraftConfig {
    /// Key of the main form record.
    pub form_key: String,
    /// Key of the guest list.
    pub guests_key: String,
    /// Key of the children list.
    pub children_key: String,
    /// Key of the profile image.
    pub profile_image_key: String,
    /// Quiet period before a debounced write, in milliseconds.
    pub debounce_ms: u32,
    /// Maximum width of a persisted profile image.
    pub image_max_width: u32,
    /// Lossy encoding quality of a persisted profile image.
    pub image_quality: f64,
    /// Largest accepted image file, in bytes.
    pub max_image_bytes: u64,
    /// Accepted image mime types.
    pub allowed_image_types: Vec<String>,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            form_key: FORM_KEY.to_string(),
            guests_key: GUESTS_KEY.to_string(),
            children_key: CHILDREN_KEY.to_string(),
            profile_image_key: PROFILE_IMAGE_KEY.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            image_max_width: DEFAULT_MAX_WIDTH,
            image_quality: DEFAULT_QUALITY,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            allowed_image_types: ["image/jpeg", "image/png", "image/gif"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl DraftConfig {
    /// Builds a configuration whose four keys share `prefix`.
    pub fn with_key_prefix(prefix: &str) -> Self {
        Self {
            form_key: format!("{prefix}_data"),
            guests_key: format!("{prefix}_guests"),
            children_key: format!("{prefix}_kids"),
            profile_image_key: format!("{prefix}_profile_image"),
            ..Self::default()
        }
    }

    /// Parses and checks a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON or a configuration rejected by
    /// [`DraftConfig::check`].
    pub fn from_json(raw: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| format!("invalid draft config: {e}"))?;
        config.check()?;
        Ok(config)
    }

    /// Returns the four storage keys in form, guests, children, image order.
    pub fn storage_keys(&self) -> [&str; 4] {
        [
            &self.form_key,
            &self.guests_key,
            &self.children_key,
            &self.profile_image_key,
        ]
    }

    /// Checks that keys are non-empty and pairwise distinct and that the image settings are
    /// usable.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn check(&self) -> Result<(), String> {
        let keys = self.storage_keys();
        for (index, key) in keys.iter().enumerate() {
            if key.trim().is_empty() {
                return Err("draft storage keys must not be empty".to_string());
            }
            if keys[index + 1..].contains(key) {
                return Err(format!("draft storage key `{key}` is used twice"));
            }
        }
        if self.image_max_width == 0 {
            return Err("image_max_width must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.image_quality) {
            return Err(format!(
                "image_quality {} is outside 0.0..=1.0",
                self.image_quality
            ));
        }
        Ok(())
    }

    /// Returns whether `mime_type` is an accepted image type.
    pub fn accepts_image_type(&self, mime_type: &str) -> bool {
        self.allowed_image_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime_type.trim()))
    }
}
