use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use kh_core::domain::entities::verification_attempt::VerificationAttempt;
use kh_core::errors::DomainError;
use kh_core::repositories::VerificationRepository;

/// Verification attempts keyed by id
#[derive(Default)]
pub struct InMemoryVerificationRepository {
    attempts: RwLock<HashMap<Uuid, VerificationAttempt>>,
}

impl InMemoryVerificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.attempts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.attempts.read().await.is_empty()
    }
}

#[async_trait]
impl VerificationRepository for InMemoryVerificationRepository {
    async fn create(&self, attempt: &VerificationAttempt) -> Result<VerificationAttempt, DomainError> {
        self.attempts
            .write()
            .await
            .insert(attempt.id, attempt.clone());
        Ok(attempt.clone())
    }

    async fn find_latest_by_phone(&self, phone: &str) -> Result<Option<VerificationAttempt>, DomainError> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .values()
            .filter(|a| a.phone == phone)
            .max_by_key(|a| a.created_at)
            .cloned())
    }

    async fn update(&self, attempt: &VerificationAttempt) -> Result<(), DomainError> {
        let mut attempts = self.attempts.write().await;
        match attempts.get_mut(&attempt.id) {
            Some(stored) => {
                stored.code = attempt.code.clone();
                stored.attempts = attempt.attempts;
                stored.verified = attempt.verified;
                Ok(())
            }
            None => Err(DomainError::NotFound {
                resource: format!("verification attempt {}", attempt.id),
            }),
        }
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut attempts = self.attempts.write().await;
        let before = attempts.len();
        attempts.retain(|_, a| a.expires_at >= cutoff);
        Ok((before - attempts.len()) as u64)
    }
}
