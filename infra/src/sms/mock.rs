//! Mock SMS provider for development and testing
//!
//! Generates and checks codes in process, logging instead of sending. Never
//! allowed in production (enforced by configuration validation).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use kh_core::domain::entities::VerificationAttempt;
use kh_core::errors::SmsProviderError;
use kh_core::services::verification::{ProviderCheck, ProviderDispatch, SmsProvider};
use kh_shared::utils::phone::mask_phone_number;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Mock SMS provider
///
/// This implementation:
/// - Keeps provider-side codes in memory, one per phone
/// - Records plain messages for inspection
/// - Can simulate an unavailable provider
#[derive(Default)]
pub struct MockSmsProvider {
    codes: RwLock<HashMap<String, String>>,
    messages: RwLock<Vec<(String, String)>>,
    fixed_code: Option<String>,
    request_count: AtomicU64,
    simulate_failure: AtomicBool,
}

impl MockSmsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every started verification uses `code` instead of a random one
    pub fn with_fixed_code(code: impl Into<String>) -> Self {
        Self {
            fixed_code: Some(code.into()),
            ..Self::default()
        }
    }

    /// Make verification calls fail as if the provider were down.
    /// Plain messages still go through, exercising the local fallback.
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Total number of provider calls made
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Code the provider "delivered" to `phone`
    pub async fn code_for(&self, phone: &str) -> Option<String> {
        self.codes.read().await.get(phone).cloned()
    }

    pub async fn sent_messages(&self) -> Vec<(String, String)> {
        self.messages.read().await.clone()
    }

    fn unavailable(&self) -> Result<(), SmsProviderError> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            return Err(SmsProviderError::Server {
                status: 503,
                message: "mock provider unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SmsProvider for MockSmsProvider {
    async fn start_verification(&self, phone: &str) -> Result<ProviderDispatch, SmsProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.unavailable()?;

        let code = self
            .fixed_code
            .clone()
            .unwrap_or_else(VerificationAttempt::generate_code);
        info!(
            phone = %mask_phone_number(phone),
            code = %code,
            "[MOCK SMS] Verification started"
        );
        self.codes.write().await.insert(phone.to_string(), code);

        Ok(ProviderDispatch {
            sid: format!("VE{}", Uuid::new_v4().simple()),
            status: "pending".to_string(),
        })
    }

    async fn check_verification(&self, phone: &str, code: &str) -> Result<ProviderCheck, SmsProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.unavailable()?;

        let mut codes = self.codes.write().await;
        match codes.get(phone) {
            Some(expected) if expected == code => {
                codes.remove(phone);
                Ok(ProviderCheck::Approved)
            }
            Some(_) => Ok(ProviderCheck::NotApproved {
                status: "pending".to_string(),
            }),
            None => Err(SmsProviderError::NotFound),
        }
    }

    async fn send_message(&self, phone: &str, body: &str) -> Result<String, SmsProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        info!(phone = %mask_phone_number(phone), body = %body, "[MOCK SMS] Message sent");
        self.messages
            .write()
            .await
            .push((phone.to_string(), body.to_string()));
        Ok(format!("SM{}", Uuid::new_v4().simple()))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_code_round_trip() {
        let provider = MockSmsProvider::with_fixed_code("482913");
        provider.start_verification("+966501234567").await.unwrap();

        assert_eq!(
            provider.check_verification("+966501234567", "000000").await.unwrap(),
            ProviderCheck::NotApproved {
                status: "pending".to_string()
            }
        );
        assert_eq!(
            provider.check_verification("+966501234567", "482913").await.unwrap(),
            ProviderCheck::Approved
        );
        // Approved verifications are consumed
        assert_eq!(
            provider.check_verification("+966501234567", "482913").await,
            Err(SmsProviderError::NotFound)
        );
        assert_eq!(provider.request_count(), 4);
    }

    #[tokio::test]
    async fn test_random_code_is_recorded() {
        let provider = MockSmsProvider::new();
        provider.start_verification("+966501234567").await.unwrap();

        let code = provider.code_for("+966501234567").await.unwrap();
        assert_eq!(code.len(), 6);
    }

    #[tokio::test]
    async fn test_simulated_failure_spares_plain_messages() {
        let provider = MockSmsProvider::new();
        provider.set_simulate_failure(true);

        let err = provider.start_verification("+966501234567").await.unwrap_err();
        assert!(err.is_transient());

        provider.send_message("+966501234567", "code 123456").await.unwrap();
        assert_eq!(provider.sent_messages().await.len(), 1);
    }
}
