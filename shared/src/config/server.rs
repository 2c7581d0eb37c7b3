//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{parse_or, ConfigError, EnvSource};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Preflight cache lifetime in seconds
    #[serde(default = "default_cors_max_age")]
    pub cors_max_age: usize,

    /// Explicitly allowed CORS origins (production)
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
            workers: 0,
            cors_max_age: default_cors_max_age(),
            allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Read `SERVER_HOST`, `SERVER_PORT`, `SERVER_WORKERS`, `CORS_MAX_AGE`, `ALLOWED_ORIGINS`
    pub fn from_source(source: &impl EnvSource) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: source.get("SERVER_HOST").unwrap_or(defaults.host),
            port: parse_or(source, "SERVER_PORT", defaults.port)?,
            workers: parse_or(source, "SERVER_WORKERS", defaults.workers)?,
            cors_max_age: parse_or(source, "CORS_MAX_AGE", defaults.cors_max_age)?,
            allowed_origins: source
                .get("ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_cors_max_age() -> usize {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut env = HashMap::new();
        env.insert("SERVER_PORT".to_string(), "eighty".to_string());
        let err = ServerConfig::from_source(&env).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == "SERVER_PORT"));
    }

    #[test]
    fn test_allowed_origins_are_split() {
        let mut env = HashMap::new();
        env.insert(
            "ALLOWED_ORIGINS".to_string(),
            "https://khidma.app, https://admin.khidma.app,".to_string(),
        );
        let config = ServerConfig::from_source(&env).unwrap();
        assert_eq!(config.allowed_origins.len(), 2);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }
}
