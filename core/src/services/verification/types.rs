//! Types for verification service results

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::verification_attempt::VerificationChannel;

/// Provider acknowledgement of a started verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDispatch {
    /// Provider-side identifier (e.g. Twilio `VE...` sid)
    pub sid: String,
    /// Provider status, usually `pending`
    pub status: String,
}

/// Provider verdict on a submitted code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCheck {
    Approved,
    /// `pending`, `canceled` or any other non-approved status
    NotApproved { status: String },
}

/// Result of sending a verification code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    /// Normalized phone the code was sent to
    pub phone: String,
    pub status: String,
    pub channel: VerificationChannel,
    pub is_test_phone: bool,
    pub expires_at: DateTime<Utc>,
    /// Seconds before the client should offer a resend
    pub resend_after: i64,
}

/// Result of a successful check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub phone: String,
    pub verified: bool,
}

/// Server-side view of a user's verification flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatus {
    pub phone_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
