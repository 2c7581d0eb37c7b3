//! Database configuration module

use serde::{Deserialize, Serialize};

use super::{parse_or, required, ConfigError, EnvSource};

/// Database configuration for MySQL connections
#[derive(Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout: u64,

    /// Maximum lifetime of a connection in seconds
    pub max_lifetime: u64,
}

impl DatabaseConfig {
    /// Create a new database configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            connect_timeout: 30,
            idle_timeout: 600,
            max_lifetime: 1800,
        }
    }

    /// Read `DATABASE_URL` (required) and the pool tuning variables
    pub fn from_source(source: &impl EnvSource) -> Result<Self, ConfigError> {
        let defaults = Self::new(required(source, "DATABASE_URL")?);
        Ok(Self {
            max_connections: parse_or(source, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            connect_timeout: parse_or(source, "DATABASE_CONNECT_TIMEOUT", defaults.connect_timeout)?,
            ..defaults
        })
    }

    /// Set the maximum number of connections
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

// The URL carries credentials
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .field("max_lifetime", &self.max_lifetime)
            .finish()
    }
}
