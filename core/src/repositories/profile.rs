//! Profile repository trait for the `profiles` table.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::profile::UserProfile;
use crate::errors::DomainError;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, DomainError>;

    /// Insert or replace a profile
    async fn save(&self, profile: &UserProfile) -> Result<(), DomainError>;

    /// Set `phone` and `phone_verified = true` on one user's profile,
    /// creating the row when the auth platform has not yet done so
    async fn mark_verified_for_user(&self, user_id: Uuid, phone: &str) -> Result<(), DomainError>;

    /// Set `phone_verified = true` on every profile holding `phone`
    ///
    /// Returns the number of profiles updated; zero is not an error.
    async fn mark_verified_by_phone(&self, phone: &str) -> Result<u64, DomainError>;
}
