//! Verification attempt repository trait.
//!
//! Backs the `phone_verification_codes` table. The service only ever reasons
//! about the most recent attempt for a phone.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::verification_attempt::VerificationAttempt;
use crate::errors::DomainError;

/// Repository trait for verification attempt persistence
///
/// # Example
/// ```no_run
/// # use kh_core::repositories::VerificationRepository;
/// # async fn example(repo: &impl VerificationRepository) -> Result<(), kh_core::errors::DomainError> {
/// if let Some(attempt) = repo.find_latest_by_phone("+966501234567").await? {
///     println!("attempts so far: {}", attempt.attempts);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait VerificationRepository: Send + Sync {
    /// Persist a new attempt
    ///
    /// # Returns
    /// * `Ok(VerificationAttempt)` - The stored attempt
    /// * `Err(DomainError)` - Storage failure
    async fn create(&self, attempt: &VerificationAttempt) -> Result<VerificationAttempt, DomainError>;

    /// Most recent attempt for a phone, by `created_at` descending
    ///
    /// Expired and verified attempts are returned too; the caller decides.
    async fn find_latest_by_phone(&self, phone: &str) -> Result<Option<VerificationAttempt>, DomainError>;

    /// Overwrite the mutable fields (`code`, `attempts`, `verified`) of an attempt
    ///
    /// # Returns
    /// * `Err(DomainError::NotFound)` - No attempt with that id
    async fn update(&self, attempt: &VerificationAttempt) -> Result<(), DomainError>;

    /// Delete attempts whose `expires_at` is before `cutoff`
    ///
    /// # Returns
    /// Number of rows removed
    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError>;
}
