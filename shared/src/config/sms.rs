//! SMS provider configuration

use std::str::FromStr;

use super::{parse_or, required, ConfigError, EnvSource};

/// Default Twilio Verify API base URL
pub const TWILIO_VERIFY_BASE_URL: &str = "https://verify.twilio.com/v2";

/// Default Twilio REST API base URL
pub const TWILIO_API_BASE_URL: &str = "https://api.twilio.com/2010-04-01";

/// Which SMS provider implementation to wire in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsProviderKind {
    /// Twilio Verify with Twilio Messages as the fallback channel
    Twilio,
    /// Logs codes instead of sending them (non-production only)
    Mock,
}

impl FromStr for SmsProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "twilio" => Ok(SmsProviderKind::Twilio),
            "mock" => Ok(SmsProviderKind::Mock),
            other => Err(format!("unknown SMS provider '{}'", other)),
        }
    }
}

/// Twilio credentials and client tuning
#[derive(Clone)]
pub struct TwilioSettings {
    /// Account SID
    pub account_sid: String,
    /// Auth token
    pub auth_token: String,
    /// Verify service SID (`VA...`)
    pub verify_service_sid: String,
    /// Sender number for the fallback channel (E.164)
    pub from_number: Option<String>,
    /// Messaging service SID for the fallback channel
    pub messaging_service_sid: Option<String>,
    /// Maximum attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
    pub verify_base_url: String,
    pub api_base_url: String,
}

impl TwilioSettings {
    /// Read the `TWILIO_*` variables. Credentials have no defaults.
    pub fn from_source(source: &impl EnvSource) -> Result<Self, ConfigError> {
        let from_number = source.get("TWILIO_FROM_NUMBER");
        let messaging_service_sid = source.get("TWILIO_MESSAGING_SERVICE_SID");

        if from_number.is_none() && messaging_service_sid.is_none() {
            return Err(ConfigError::Missing {
                var: "TWILIO_FROM_NUMBER or TWILIO_MESSAGING_SERVICE_SID".to_string(),
            });
        }
        if let Some(number) = &from_number {
            if !number.starts_with('+') {
                return Err(ConfigError::Invalid {
                    var: "TWILIO_FROM_NUMBER".to_string(),
                    reason: "must be in E.164 format (starting with '+')".to_string(),
                });
            }
        }

        Ok(Self {
            account_sid: required(source, "TWILIO_ACCOUNT_SID")?,
            auth_token: required(source, "TWILIO_AUTH_TOKEN")?,
            verify_service_sid: required(source, "TWILIO_VERIFY_SERVICE_SID")?,
            from_number,
            messaging_service_sid,
            max_retries: parse_or(source, "TWILIO_MAX_RETRIES", 2)?,
            retry_delay_ms: parse_or(source, "TWILIO_RETRY_DELAY_MS", 500)?,
            request_timeout_secs: parse_or(source, "TWILIO_REQUEST_TIMEOUT_SECS", 10)?,
            verify_base_url: source
                .get("TWILIO_VERIFY_BASE_URL")
                .unwrap_or_else(|| TWILIO_VERIFY_BASE_URL.to_string()),
            api_base_url: source
                .get("TWILIO_API_BASE_URL")
                .unwrap_or_else(|| TWILIO_API_BASE_URL.to_string()),
        })
    }
}

impl std::fmt::Debug for TwilioSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioSettings")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("verify_service_sid", &self.verify_service_sid)
            .field("from_number", &self.from_number)
            .field("messaging_service_sid", &self.messaging_service_sid)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// SMS service configuration
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub provider: SmsProviderKind,
    /// Present when `provider` is Twilio
    pub twilio: Option<TwilioSettings>,
}

impl SmsConfig {
    pub fn mock() -> Self {
        Self {
            provider: SmsProviderKind::Mock,
            twilio: None,
        }
    }

    /// Read `SMS_PROVIDER` (default `twilio`) and the provider's settings
    pub fn from_source(source: &impl EnvSource) -> Result<Self, ConfigError> {
        let provider = parse_or(source, "SMS_PROVIDER", SmsProviderKind::Twilio)?;
        let twilio = match provider {
            SmsProviderKind::Twilio => Some(TwilioSettings::from_source(source)?),
            SmsProviderKind::Mock => None,
        };
        Ok(Self { provider, twilio })
    }
}
