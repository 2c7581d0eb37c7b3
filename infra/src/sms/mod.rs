//! SMS provider module
//!
//! Implementations of the core `SmsProvider` port:
//!
//! - **Twilio**: Verify v2 for provider-managed codes, Messages for plain SMS
//! - **Mock**: in-process codes for development and tests

pub mod mock;
pub mod twilio;

pub use mock::MockSmsProvider;
pub use twilio::TwilioSmsProvider;

use kh_core::services::verification::SmsProvider;
use kh_shared::config::{SmsConfig, SmsProviderKind};

use crate::InfrastructureError;

/// Create an SMS provider based on configuration
///
/// Missing Twilio settings are a configuration error; there is no silent
/// downgrade to the mock provider.
pub fn create_sms_provider(config: &SmsConfig) -> Result<Box<dyn SmsProvider>, InfrastructureError> {
    match config.provider {
        SmsProviderKind::Mock => {
            tracing::warn!("Using mock SMS provider; no messages will be delivered");
            Ok(Box::new(MockSmsProvider::new()))
        }
        SmsProviderKind::Twilio => {
            let settings = config.twilio.clone().ok_or_else(|| {
                InfrastructureError::Config("Twilio settings missing for SMS_PROVIDER=twilio".to_string())
            })?;
            Ok(Box::new(TwilioSmsProvider::new(settings)?))
        }
    }
}
