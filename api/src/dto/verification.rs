use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST .../verify/send`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendCodeRequest {
    /// E.164 number; a missing leading '+' is added server-side
    /// Examples: "+966501234567", "966501234567"
    #[serde(default)]
    #[validate(length(max = 32))]
    pub phone_number: String,
}

/// Body of `POST .../verify/check`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckCodeRequest {
    #[serde(default)]
    #[validate(length(max = 32))]
    pub phone_number: String,

    #[serde(default)]
    #[validate(length(max = 16))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCodeResponse {
    pub success: bool,
    /// Provider status, `pending` once a code is on its way
    pub status: String,
    pub is_test_phone: bool,
    pub message: String,
    pub expires_at: DateTime<Utc>,
    /// Seconds until the client may offer a resend
    pub resend_after: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckCodeResponse {
    pub success: bool,
    pub verified: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatusResponse {
    pub success: bool,
    pub phone_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
