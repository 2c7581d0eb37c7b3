//! Phone verification policy configuration
//!
//! Includes the test phone map, which is parsed once at start-up from
//! `TEST_PHONE_NUMBERS` (`phone=code,phone=code`) and then shared by
//! reference with the verification service.

use std::collections::HashMap;

use crate::utils::code::is_valid_code_format;
use crate::utils::phone::normalize_e164;

use super::{parse_or, ConfigError, EnvSource};

/// Default SMS body for codes delivered through the fallback channel.
/// `{code}` and `{minutes}` are substituted.
pub const DEFAULT_SMS_TEMPLATE: &str = "رمز التحقق الخاص بك هو {code}. صالح لمدة {minutes} دقائق.";

/// Phone numbers that bypass SMS delivery with a fixed code
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestPhoneNumbers {
    codes: HashMap<String, String>,
}

impl TestPhoneNumbers {
    /// Parse `phone=code` pairs separated by commas.
    ///
    /// Phones are normalized to E.164 so lookups match request phones.
    /// Empty segments are skipped; anything else malformed is an error.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut codes = HashMap::new();

        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let invalid = |reason: &str| ConfigError::Invalid {
                var: "TEST_PHONE_NUMBERS".to_string(),
                reason: format!("{} in entry '{}'", reason, entry),
            };

            let (phone, code) = entry
                .split_once('=')
                .ok_or_else(|| invalid("expected phone=code"))?;
            let phone = normalize_e164(phone.trim()).ok_or_else(|| invalid("invalid phone"))?;
            let code = code.trim();
            if !is_valid_code_format(code) {
                return Err(invalid("code must be 1 to 10 visible ASCII characters"));
            }
            codes.insert(phone, code.to_string());
        }

        Ok(Self { codes })
    }

    /// Build a map from already normalized pairs
    pub fn from_pairs<I, P, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        Self {
            codes: pairs
                .into_iter()
                .map(|(p, c)| (p.into(), c.into()))
                .collect(),
        }
    }

    /// Fixed code for a normalized phone, if it is a test phone
    pub fn code_for(&self, phone: &str) -> Option<&str> {
        self.codes.get(phone).map(String::as_str)
    }

    pub fn contains(&self, phone: &str) -> bool {
        self.codes.contains_key(phone)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Verification policy
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Minutes before an attempt expires
    pub code_ttl_minutes: i64,
    /// Checks allowed per attempt
    pub max_attempts: i32,
    /// Seconds the client waits before offering a resend
    pub resend_cooldown_secs: i64,
    pub test_phones: TestPhoneNumbers,
    /// Extra code accepted for test phones only
    pub universal_test_code: Option<String>,
    /// Body for codes sent through the fallback channel
    pub sms_template: String,
    /// Hours an expired attempt is kept before deletion
    pub retention_hours: i64,
    /// Seconds between retention sweeps, 0 disables the sweep
    pub cleanup_interval_secs: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: 10,
            max_attempts: 3,
            resend_cooldown_secs: 60,
            test_phones: TestPhoneNumbers::default(),
            universal_test_code: None,
            sms_template: DEFAULT_SMS_TEMPLATE.to_string(),
            retention_hours: 24,
            cleanup_interval_secs: 3600,
        }
    }
}

impl VerificationConfig {
    pub fn from_source(source: &impl EnvSource) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let sms_template = source
            .get("VERIFICATION_SMS_TEMPLATE")
            .unwrap_or(defaults.sms_template);
        if !sms_template.contains("{code}") {
            return Err(ConfigError::Invalid {
                var: "VERIFICATION_SMS_TEMPLATE".to_string(),
                reason: "must contain the {code} placeholder".to_string(),
            });
        }

        let config = Self {
            code_ttl_minutes: parse_or(source, "VERIFICATION_CODE_TTL_MINUTES", defaults.code_ttl_minutes)?,
            max_attempts: parse_or(source, "VERIFICATION_MAX_ATTEMPTS", defaults.max_attempts)?,
            resend_cooldown_secs: parse_or(
                source,
                "VERIFICATION_RESEND_COOLDOWN_SECS",
                defaults.resend_cooldown_secs,
            )?,
            test_phones: match source.get("TEST_PHONE_NUMBERS") {
                Some(raw) => TestPhoneNumbers::parse(&raw)?,
                None => TestPhoneNumbers::default(),
            },
            universal_test_code: source.get("VERIFICATION_UNIVERSAL_TEST_CODE"),
            sms_template,
            retention_hours: parse_or(source, "VERIFICATION_RETENTION_HOURS", defaults.retention_hours)?,
            cleanup_interval_secs: parse_or(
                source,
                "VERIFICATION_CLEANUP_INTERVAL_SECS",
                defaults.cleanup_interval_secs,
            )?,
        };

        if let Some(code) = &config.universal_test_code {
            if !is_valid_code_format(code) {
                return Err(ConfigError::Invalid {
                    var: "VERIFICATION_UNIVERSAL_TEST_CODE".to_string(),
                    reason: "must be 1 to 10 visible ASCII characters".to_string(),
                });
            }
        }
        if config.code_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                var: "VERIFICATION_CODE_TTL_MINUTES".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if config.max_attempts <= 0 {
            return Err(ConfigError::Invalid {
                var: "VERIFICATION_MAX_ATTEMPTS".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        Ok(config)
    }

    /// Render the fallback SMS body for a code
    pub fn render_sms(&self, code: &str) -> String {
        self.sms_template
            .replace("{code}", code)
            .replace("{minutes}", &self.code_ttl_minutes.to_string())
    }
}
