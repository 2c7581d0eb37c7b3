//! Trait for SMS provider integration

use async_trait::async_trait;

use crate::errors::SmsProviderError;

use super::types::{ProviderCheck, ProviderDispatch};

/// SMS provider able to manage verification codes and send plain messages
#[async_trait]
pub trait SmsProvider: Send + Sync {
    /// Ask the provider to generate and deliver a code to `phone`
    async fn start_verification(&self, phone: &str) -> Result<ProviderDispatch, SmsProviderError>;

    /// Ask the provider whether `code` matches its pending verification
    async fn check_verification(&self, phone: &str, code: &str) -> Result<ProviderCheck, SmsProviderError>;

    /// Send a plain SMS, returning the provider's message id
    async fn send_message(&self, phone: &str, body: &str) -> Result<String, SmsProviderError>;

    /// Provider name for logs
    fn provider_name(&self) -> &str;
}

#[async_trait]
impl<T: SmsProvider + ?Sized> SmsProvider for Box<T> {
    async fn start_verification(&self, phone: &str) -> Result<ProviderDispatch, SmsProviderError> {
        (**self).start_verification(phone).await
    }

    async fn check_verification(&self, phone: &str, code: &str) -> Result<ProviderCheck, SmsProviderError> {
        (**self).check_verification(phone, code).await
    }

    async fn send_message(&self, phone: &str, body: &str) -> Result<String, SmsProviderError> {
        (**self).send_message(phone, body).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}
