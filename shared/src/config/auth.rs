//! Bearer token configuration
//!
//! Access tokens are issued by the hosted auth platform and signed with a
//! shared HS256 secret. This service only validates them.

use super::{parse_or, required, ConfigError, EnvSource};

/// JWT validation configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Shared HS256 secret
    pub jwt_secret: String,

    /// Expected `aud` claim
    pub audience: String,

    /// Expected `iss` claim, unchecked when absent
    pub issuer: Option<String>,

    /// Allowed clock skew in seconds
    pub leeway_seconds: u64,
}

impl AuthConfig {
    /// Create a configuration with the platform's default audience
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            audience: String::from("authenticated"),
            issuer: None,
            leeway_seconds: 30,
        }
    }

    /// Read `JWT_SECRET` (required), `JWT_AUDIENCE`, `JWT_ISSUER`, `JWT_LEEWAY_SECS`
    pub fn from_source(source: &impl EnvSource) -> Result<Self, ConfigError> {
        let defaults = Self::new(required(source, "JWT_SECRET")?);
        Ok(Self {
            audience: source.get("JWT_AUDIENCE").unwrap_or(defaults.audience.clone()),
            issuer: source.get("JWT_ISSUER"),
            leeway_seconds: parse_or(source, "JWT_LEEWAY_SECS", defaults.leeway_seconds)?,
            ..defaults
        })
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}
