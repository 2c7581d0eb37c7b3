//! Twilio SMS provider implementation
//!
//! Talks to two Twilio REST APIs over HTTPS with basic auth:
//!
//! - **Verify v2** (`/Services/{sid}/Verifications`, `/VerificationCheck`):
//!   Twilio generates, delivers and checks the code
//! - **Messages** (`/Accounts/{sid}/Messages.json`): plain SMS, used for
//!   locally generated fallback codes
//!
//! Starting a verification is retried with exponential backoff on transport
//! failures and 5xx answers. Checks and plain messages are sent once: a
//! timed-out check may already have been approved, and a timed-out message
//! may already have been delivered.
//! Phone numbers are masked in every log line.

use std::time::Duration;

use async_trait::async_trait;
use kh_core::errors::SmsProviderError;
use kh_core::services::verification::{ProviderCheck, ProviderDispatch, SmsProvider};
use kh_shared::config::TwilioSettings;
use kh_shared::utils::phone::mask_phone_number;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::InfrastructureError;

/// Twilio error code for an unknown or finished verification
const TWILIO_NOT_FOUND: i64 = 20404;
/// Max check attempts reached
const TWILIO_MAX_CHECK_ATTEMPTS: i64 = 60202;
/// Max send attempts reached
const TWILIO_MAX_SEND_ATTEMPTS: i64 = 60203;

/// Twilio's message size limit
const MAX_MESSAGE_LENGTH: usize = 1600;

#[derive(Debug, Deserialize)]
struct VerificationResponse {
    sid: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

#[derive(Debug, Default, Deserialize)]
struct TwilioErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

/// Twilio SMS provider
pub struct TwilioSmsProvider {
    client: Client,
    settings: TwilioSettings,
}

impl TwilioSmsProvider {
    /// Create a new Twilio provider with a request timeout from the settings
    pub fn new(settings: TwilioSettings) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        info!(
            verify_service = %settings.verify_service_sid,
            sender = %sender_label(&settings),
            "Twilio SMS provider initialized"
        );

        Ok(Self { client, settings })
    }

    fn verifications_url(&self) -> String {
        format!(
            "{}/Services/{}/Verifications",
            self.settings.verify_base_url, self.settings.verify_service_sid
        )
    }

    fn verification_check_url(&self) -> String {
        format!(
            "{}/Services/{}/VerificationCheck",
            self.settings.verify_base_url, self.settings.verify_service_sid
        )
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.settings.api_base_url, self.settings.account_sid
        )
    }

    /// POST a form, retrying transient failures
    ///
    /// Only for requests Twilio can safely see twice.
    async fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, SmsProviderError> {
        let mut attempt = 0;
        let mut delay = Duration::from_millis(self.settings.retry_delay_ms);

        loop {
            attempt += 1;

            match self.post_form_once(url, params).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt <= self.settings.max_retries => {
                    warn!(
                        attempt = attempt,
                        max_retries = self.settings.max_retries,
                        error = %e,
                        "Twilio request failed, retrying after {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn post_form_once<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, SmsProviderError> {
        let response = self
            .client
            .post(url)
            .basic_auth(&self.settings.account_sid, Some(&self.settings.auth_token))
            .form(params)
            .send()
            .await
            .map_err(|e| SmsProviderError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| SmsProviderError::Transport {
            message: e.to_string(),
        })?;

        if !(200..300).contains(&status) {
            return Err(classify_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| SmsProviderError::Transport {
            message: format!("Unreadable Twilio response: {}", e),
        })
    }
}

#[async_trait]
impl SmsProvider for TwilioSmsProvider {
    async fn start_verification(&self, phone: &str) -> Result<ProviderDispatch, SmsProviderError> {
        debug!(phone = %mask_phone_number(phone), "Starting Twilio verification");

        let response: VerificationResponse = self
            .post_form(&self.verifications_url(), &[("To", phone), ("Channel", "sms")])
            .await?;

        info!(
            phone = %mask_phone_number(phone),
            sid = %response.sid,
            status = %response.status,
            "Twilio verification started"
        );
        Ok(ProviderDispatch {
            sid: response.sid,
            status: response.status,
        })
    }

    async fn check_verification(&self, phone: &str, code: &str) -> Result<ProviderCheck, SmsProviderError> {
        let response: VerificationResponse = self
            .post_form_once(&self.verification_check_url(), &[("To", phone), ("Code", code)])
            .await?;

        debug!(
            phone = %mask_phone_number(phone),
            status = %response.status,
            "Twilio verification check answered"
        );
        Ok(map_check_status(&response.status))
    }

    async fn send_message(&self, phone: &str, body: &str) -> Result<String, SmsProviderError> {
        if body.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(SmsProviderError::Rejected {
                status: 400,
                message: format!("Message exceeds maximum length of {} characters", MAX_MESSAGE_LENGTH),
            });
        }

        let mut params = vec![("To", phone), ("Body", body)];
        match (&self.settings.messaging_service_sid, &self.settings.from_number) {
            (Some(service_sid), _) => params.push(("MessagingServiceSid", service_sid.as_str())),
            (None, Some(from)) => params.push(("From", from.as_str())),
            (None, None) => {
                return Err(SmsProviderError::Configuration {
                    message: "no sender configured for Twilio Messages".to_string(),
                })
            }
        }

        let response: MessageResponse = self.post_form_once(&self.messages_url(), &params).await?;

        info!(
            phone = %mask_phone_number(phone),
            sid = %response.sid,
            "SMS sent via Twilio Messages"
        );
        Ok(response.sid)
    }

    fn provider_name(&self) -> &str {
        "twilio"
    }
}

/// Map a non-2xx Twilio answer to a provider error
fn classify_error(status: u16, body: &str) -> SmsProviderError {
    let error: TwilioErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = error.message.unwrap_or_else(|| body.chars().take(200).collect());

    match (status, error.code) {
        (_, Some(TWILIO_NOT_FOUND)) | (404, _) => SmsProviderError::NotFound,
        (_, Some(TWILIO_MAX_CHECK_ATTEMPTS)) | (_, Some(TWILIO_MAX_SEND_ATTEMPTS)) | (429, _) => {
            SmsProviderError::Exhausted
        }
        (500..=599, _) => SmsProviderError::Server { status, message },
        _ => SmsProviderError::Rejected { status, message },
    }
}

/// Map a Verify status string to a check result
fn map_check_status(status: &str) -> ProviderCheck {
    if status.eq_ignore_ascii_case("approved") {
        ProviderCheck::Approved
    } else {
        ProviderCheck::NotApproved {
            status: status.to_string(),
        }
    }
}

fn sender_label(settings: &TwilioSettings) -> String {
    match (&settings.messaging_service_sid, &settings.from_number) {
        (Some(sid), _) => sid.clone(),
        (None, Some(from)) => mask_phone_number(from),
        (None, None) => "none".to_string(),
    }
}
