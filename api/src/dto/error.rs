use serde::{Deserialize, Serialize};

/// Failure body shared by every endpoint
///
/// `verified` is only present on check endpoints, `remainingAttempts` only
/// after a wrong code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    /// Localized message
    pub error: String,
    /// Stable machine code, e.g. `INVALID_PHONE_FORMAT`
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            verified: None,
            error: error.into(),
            code: code.into(),
            remaining_attempts: None,
            details: None,
        }
    }

    /// Mark as the answer to a check request
    pub fn for_check(mut self, remaining_attempts: Option<i32>) -> Self {
        self.verified = Some(false);
        self.remaining_attempts = remaining_attempts;
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
