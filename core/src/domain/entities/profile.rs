//! User profile entity owned by the profile store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile row for a marketplace user
///
/// `phone_verified` is the only flag the client router consults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub phone: Option<String>,
    pub phone_verified: bool,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            phone: None,
            phone_verified: false,
            name: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the phone and raises the verified flag
    pub fn mark_phone_verified(&mut self, phone: &str) {
        self.phone = Some(phone.to_string());
        self.phone_verified = true;
        self.updated_at = Utc::now();
    }
}
