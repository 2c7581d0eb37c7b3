//! Domain-specific error types and error handling.

mod types;


// Re-export all error types
pub use types::{AuthError, SmsProviderError, ValidationError, VerificationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Sms(#[from] SmsProviderError),
}

impl DomainError {
    /// Stable machine code reported to clients
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Unauthorized => "UNAUTHORIZED",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Verification(e) => e.error_code(),
            DomainError::ValidationErr(e) => e.error_code(),
            DomainError::Auth(_) => "UNAUTHORIZED",
            DomainError::Sms(_) => "SMS_PROVIDER_UNAVAILABLE",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
