//! Submission rules for the main registration form.

use serde::{Deserialize, Serialize};

use crate::model::{FormField, RegistrationForm};

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed.
    pub field: FormField,
    /// User-facing message.
    pub message: String,
}

impl FieldError {
    fn new(field: FormField, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

const NAME_MESSAGE: &str = "Name must be at least 2 characters.";
const MOBILE_MESSAGE: &str = "Mobile number must be valid.";
const EMAIL_MESSAGE: &str = "Please enter a valid email address.";
const ADDRESS_MESSAGE: &str = "Address must be at least 5 characters.";

/// Lengths are UTF-16 code units, as the browser form counts them: an emoji outside the
/// Basic Multilingual Plane counts as two.
fn min_chars(value: &str, min: usize) -> bool {
    value.encode_utf16().count() >= min
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !host.starts_with('.') && tld.chars().count() >= 2
}

/// Checks `form` and returns every failing field in form order; empty means valid.
///
/// Draft storage never runs these rules, so partially filled forms persist untouched.
pub fn validate_form(form: &RegistrationForm) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !min_chars(&form.name_english, 2) {
        errors.push(FieldError::new(FormField::NameEnglish, NAME_MESSAGE));
    }
    if !min_chars(&form.mobile_number, 10) {
        errors.push(FieldError::new(FormField::MobileNumber, MOBILE_MESSAGE));
    }
    if !looks_like_email(&form.email) {
        errors.push(FieldError::new(FormField::Email, EMAIL_MESSAGE));
    }
    for field in [FormField::PresentAddress, FormField::PermanentAddress] {
        if !min_chars(form.get(field), 5) {
            errors.push(FieldError::new(field, ADDRESS_MESSAGE));
        }
    }
    errors
}
