//! Shared utilities and common types for the Khidma server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded once from the environment
//! - Language negotiation types
//! - Utility functions (phone normalization and masking)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigError, DatabaseConfig, Environment, ServerConfig, SmsConfig,
    SmsProviderKind, StorageBackend, TestPhoneNumbers, VerificationConfig,
};
pub use types::Language;
pub use utils::phone;
