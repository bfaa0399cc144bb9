//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // Not found
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    // Validation
    #[error("{0}")]
    ValidationError(String),

    #[error("Message must contain text or an image")]
    EmptyMessage,

    #[error("Cannot send a message to yourself")]
    SelfMessage,

    // Conflict
    #[error("Email already exists")]
    EmailAlreadyExists,

    // Infrastructure (wrapped)
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyMessage => "EMPTY_MESSAGE",
            Self::SelfMessage => "SELF_MESSAGE",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::EmptyMessage | Self::SelfMessage
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists)
    }
}
