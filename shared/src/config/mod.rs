//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Bearer token validation for the hosted auth platform
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection
//! - `server` - HTTP server configuration
//! - `sms` - SMS provider selection and credentials
//! - `verification` - Phone verification policy and the test phone map
//!
//! Every section is read once at process start. Required secrets have no
//! embedded defaults: a missing value is a [`ConfigError`] and the server
//! refuses to start.

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;
pub mod sms;
pub mod verification;

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use server::ServerConfig;
pub use sms::{SmsConfig, SmsProviderKind, TwilioSettings};
pub use verification::{TestPhoneNumbers, VerificationConfig};

/// Configuration loading errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {var}")]
    Missing { var: String },

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error("Configuration not allowed in {environment}: {reason}")]
    NotAllowed { environment: String, reason: String },
}

/// Source of raw configuration values
///
/// The process environment in production, a plain map in tests.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads from `std::env`, treating blank values as unset
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

pub(crate) fn required(source: &impl EnvSource, var: &str) -> Result<String, ConfigError> {
    source.get(var).ok_or_else(|| ConfigError::Missing {
        var: var.to_string(),
    })
}

pub(crate) fn parse_or<T: FromStr>(
    source: &impl EnvSource,
    var: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match source.get(var) {
        Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::Invalid {
            var: var.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Where verification attempts and profiles are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MySql,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(StorageBackend::MySql),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageBackend,
    /// Present when `storage` is MySQL
    pub database: Option<DatabaseConfig>,
    pub auth: AuthConfig,
    pub sms: SmsConfig,
    pub verification: VerificationConfig,
}

impl AppConfig {
    /// Load and validate configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&ProcessEnv)
    }

    /// Load and validate configuration from an arbitrary source
    pub fn from_source(source: &impl EnvSource) -> Result<Self, ConfigError> {
        let environment = Environment::from_source(source);
        let storage = parse_or(source, "STORAGE_BACKEND", StorageBackend::MySql)?;
        let database = match storage {
            StorageBackend::MySql => Some(DatabaseConfig::from_source(source)?),
            StorageBackend::Memory => None,
        };

        let config = Self {
            environment,
            server: ServerConfig::from_source(source)?,
            storage,
            database,
            auth: AuthConfig::from_source(source)?,
            sms: SmsConfig::from_source(source)?,
            verification: VerificationConfig::from_source(source)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject development-only collaborators in production
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.environment.is_production() {
            return Ok(());
        }
        if self.storage == StorageBackend::Memory {
            return Err(ConfigError::NotAllowed {
                environment: self.environment.to_string(),
                reason: "in-memory storage".to_string(),
            });
        }
        if self.sms.provider == SmsProviderKind::Mock {
            return Err(ConfigError::NotAllowed {
                environment: self.environment.to_string(),
                reason: "mock SMS provider".to_string(),
            });
        }
        Ok(())
    }
}
