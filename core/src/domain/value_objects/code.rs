//! Verification code as submitted by a client.

use kh_shared::utils::code::is_valid_code_format;

use crate::errors::ValidationError;

/// A submitted code: 1 to 10 visible ASCII characters, surrounding
/// whitespace trimmed. Comparison is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedCode(String);

impl SubmittedCode {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if is_valid_code_format(trimmed) {
            Ok(SubmittedCode(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidCodeFormat)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
