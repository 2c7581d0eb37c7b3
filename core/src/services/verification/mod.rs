//! Phone verification service
//!
//! One `{send, check}` workflow shared by the public and the authenticated
//! HTTP routes:
//! - provider-managed codes (Twilio Verify) with a local SMS fallback
//! - configured test phones that never reach the provider
//! - expiry and attempt limiting on the most recent attempt
//! - the `phone_verified` profile update on success
//! - a retention sweep for long-expired attempts

pub mod cleanup;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, VerificationCleanupService};
pub use service::VerificationService;
pub use traits::SmsProvider;
pub use types::{CheckOutcome, ProviderCheck, ProviderDispatch, SendOutcome, VerificationStatus};
