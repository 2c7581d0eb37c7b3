//! Claims carried by bearer tokens from the hosted auth platform.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AuthError;

/// Default audience of platform-issued access tokens
pub const DEFAULT_AUDIENCE: &str = "authenticated";

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Expiration timestamp
    pub exp: i64,

    /// Issued at timestamp
    #[serde(default)]
    pub iat: i64,

    /// Audience
    #[serde(default)]
    pub aud: Option<String>,

    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Phone recorded by the auth platform, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Claims {
    /// Creates claims for `user_id` valid for `ttl_seconds`
    pub fn new(user_id: Uuid, ttl_seconds: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            exp: now + ttl_seconds,
            iat: now,
            aud: Some(DEFAULT_AUDIENCE.to_string()),
            iss: None,
            phone: None,
            role: Some("authenticated".to_string()),
        }
    }

    /// Parses the subject as a user id
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidClaims)
    }

    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() >= self.exp
    }
}
