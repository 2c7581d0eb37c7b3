//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Khidma backend,
//! providing concrete implementations of the core crate's ports:
//!
//! - **Database**: MySQL repositories using SQLx, plus migrations
//! - **Memory**: in-process repositories for development and tests
//! - **SMS**: Twilio Verify / Messages client and a mock provider

// Re-export core types for convenience
pub use kh_core::errors::*;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// In-memory repositories
pub mod memory;

/// SMS provider module - Twilio and mock implementations
pub mod sms;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Internal {
            message: err.to_string(),
        }
    }
}
