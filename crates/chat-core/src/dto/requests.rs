//! Request DTOs for the REST endpoints
//!
//! Missing fields deserialize to empty strings so that validation, not JSON
//! decoding, reports them with a readable message. Presence checks use the
//! `required` code so callers can report them ahead of format problems.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};

/// Validation code for an absent field
pub const REQUIRED: &str = "required";

const MIN_PASSWORD_LEN: usize = 6;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error(REQUIRED, "All fields are required"));
    }
    Ok(())
}

// Blank emails are reported by `required` alone
fn email_format(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return required(value);
    }
    if !value.validate_email() {
        return Err(error("email", "Invalid email format"));
    }
    Ok(())
}

fn password_length(value: &str) -> Result<(), ValidationError> {
    required(value)?;
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(error("length", "Password must be at least 6 characters"));
    }
    Ok(())
}

fn profile_pic_present(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error(REQUIRED, "Profile pic is required"));
    }
    Ok(())
}

// ============================================================================
// Auth Requests
// ============================================================================

/// Account creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub full_name: String,

    #[serde(default)]
    #[validate(custom(function = "email_format"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "password_length"))]
    pub password: String,
}

impl SignupRequest {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Login request
///
/// Not validated: unknown emails and wrong passwords both surface as
/// invalid credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl From<&SignupRequest> for LoginRequest {
    fn from(signup: &SignupRequest) -> Self {
        Self::new(signup.email.clone(), signup.password.clone())
    }
}

/// Profile update request; only the profile image can change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    #[validate(custom(function = "profile_pic_present"))]
    pub profile_pic: String,
}

impl UpdateProfileRequest {
    pub fn new(profile_pic: impl Into<String>) -> Self {
        Self {
            profile_pic: profile_pic.into(),
        }
    }
}

// ============================================================================
// Message Requests
// ============================================================================

/// Send message request: text, an image reference, or both
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl SendMessageRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            image: None,
        }
    }

    pub fn image(image: impl Into<String>) -> Self {
        Self {
            text: None,
            image: Some(image.into()),
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Drop blank parts, trimming text
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            text: self
                .text
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            image: self.image.filter(|i| !i.is_empty()),
        }
    }

    /// Check that at least one non-blank part is present
    pub fn has_content(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
            || self.image.as_deref().is_some_and(|i| !i.is_empty())
    }
}
