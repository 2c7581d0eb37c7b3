//! Normalized E.164 phone number.

use std::fmt;

use kh_shared::utils::phone::{mask_phone_number, normalize_e164};

use crate::errors::ValidationError;

/// A phone number that passed normalization
///
/// Construction is the only place raw input is validated, so every lookup,
/// provider call and store write downstream sees the same canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize and validate user input
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        normalize_e164(raw)
            .map(PhoneNumber)
            .ok_or(ValidationError::InvalidPhoneFormat)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log-safe rendering
    pub fn masked(&self) -> String {
        mask_phone_number(&self.0)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefixes_plus() {
        let phone = PhoneNumber::parse("966501234567").unwrap();
        assert_eq!(phone.as_str(), "+966501234567");
        assert_eq!(phone.masked(), "+96****4567");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            PhoneNumber::parse(""),
            Err(ValidationError::InvalidPhoneFormat)
        ));
        assert!(matches!(
            PhoneNumber::parse("abc"),
            Err(ValidationError::InvalidPhoneFormat)
        ));
    }
}
