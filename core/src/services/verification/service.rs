//! Main verification service implementation

use std::sync::Arc;

use chrono::Utc;
use constant_time_eq::constant_time_eq;
use kh_shared::config::VerificationConfig;
use uuid::Uuid;

use crate::domain::entities::verification_attempt::{VerificationAttempt, VerificationChannel};
use crate::domain::value_objects::{PhoneNumber, SubmittedCode};
use crate::errors::{DomainError, DomainResult, SmsProviderError, VerificationError};
use crate::repositories::{ProfileRepository, VerificationRepository};

use super::traits::SmsProvider;
use super::types::{CheckOutcome, ProviderCheck, SendOutcome, VerificationStatus};

/// Verification service for sending and checking phone verification codes
pub struct VerificationService<P, V, R>
where
    P: SmsProvider,
    V: VerificationRepository,
    R: ProfileRepository,
{
    /// SMS provider for code delivery and provider-side checks
    sms_provider: Arc<P>,
    /// Store for verification attempts
    verification_repository: Arc<V>,
    /// Store holding the `phone_verified` flag
    profile_repository: Arc<R>,
    /// Verification policy
    config: VerificationConfig,
}

impl<P, V, R> VerificationService<P, V, R>
where
    P: SmsProvider,
    V: VerificationRepository,
    R: ProfileRepository,
{
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `sms_provider` - SMS provider implementation
    /// * `verification_repository` - Attempt store
    /// * `profile_repository` - Profile store
    /// * `config` - Verification policy, including the test phone map
    pub fn new(
        sms_provider: Arc<P>,
        verification_repository: Arc<V>,
        profile_repository: Arc<R>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            sms_provider,
            verification_repository,
            profile_repository,
            config,
        }
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Send a verification code to a phone number
    ///
    /// This method:
    /// 1. Normalizes the phone number to E.164
    /// 2. Short-circuits configured test phones without contacting the provider
    /// 3. Starts a provider verification, falling back to a locally generated
    ///    code sent as a plain SMS when the provider call fails
    /// 4. Records the attempt
    ///
    /// # Arguments
    ///
    /// * `raw_phone` - Phone number as entered by the user
    /// * `acting_user` - Authenticated user, if the request carried a token
    ///
    /// # Returns
    ///
    /// * `Ok(SendOutcome)` - Status, expiry and resend delay
    /// * `Err(DomainError)` - Invalid phone, delivery failure on both paths, or store failure
    pub async fn send(&self, raw_phone: &str, acting_user: Option<Uuid>) -> DomainResult<SendOutcome> {
        let phone = PhoneNumber::parse(raw_phone)?;

        if let Some(code) = self.config.test_phones.code_for(phone.as_str()) {
            let attempt = self.new_attempt(&phone, acting_user, Some(code.to_string()), VerificationChannel::TestPhone);
            let attempt = self.verification_repository.create(&attempt).await?;

            tracing::info!(
                phone = %phone.masked(),
                event = "test_phone_send",
                attempt_id = %attempt.id,
                "Test phone verification recorded without SMS delivery"
            );
            return Ok(self.send_outcome(&attempt, "pending", true));
        }

        match self.sms_provider.start_verification(phone.as_str()).await {
            Ok(dispatch) => {
                let attempt = self.new_attempt(&phone, acting_user, None, VerificationChannel::Provider);
                let attempt = self.verification_repository.create(&attempt).await?;

                tracing::info!(
                    phone = %phone.masked(),
                    event = "verification_started",
                    provider = self.sms_provider.provider_name(),
                    provider_sid = %dispatch.sid,
                    attempt_id = %attempt.id,
                    "Provider verification started"
                );
                Ok(self.send_outcome(&attempt, &dispatch.status, false))
            }
            Err(provider_error) => {
                tracing::warn!(
                    phone = %phone.masked(),
                    event = "verification_start_failed",
                    provider = self.sms_provider.provider_name(),
                    error = %provider_error,
                    "Provider verification failed, falling back to local code"
                );
                self.send_local_code(&phone, acting_user, provider_error).await
            }
        }
    }

    /// Check a submitted code
    ///
    /// Only the most recent attempt for the phone is considered. Failures are
    /// reported as `VerificationError`s so the caller can tell an expired
    /// request from a wrong code or an exhausted attempt budget.
    ///
    /// On success the profile flag is raised: for `acting_user` on that user's
    /// profile, otherwise on every profile holding the phone.
    pub async fn check(
        &self,
        raw_phone: &str,
        raw_code: &str,
        acting_user: Option<Uuid>,
    ) -> DomainResult<CheckOutcome> {
        let phone = PhoneNumber::parse(raw_phone)?;
        let code = SubmittedCode::parse(raw_code)?;

        if let Some(expected) = self.config.test_phones.code_for(phone.as_str()) {
            return self.check_test_phone(&phone, &code, expected, acting_user).await;
        }

        let mut attempt = self
            .verification_repository
            .find_latest_by_phone(phone.as_str())
            .await?
            .ok_or(VerificationError::NotFoundOrExpired)?;

        let now = Utc::now();

        if attempt.verified {
            // A used code only replays for its own session: unexpired, same user
            if attempt.is_expired_at(now) || !attempt.belongs_to(acting_user) {
                tracing::info!(
                    phone = %phone.masked(),
                    event = "verification_recheck_refused",
                    attempt_id = %attempt.id,
                    "Repeated check outside the attempt's window or owner"
                );
                return Err(VerificationError::NotFoundOrExpired.into());
            }

            return match attempt.code.as_deref() {
                Some(stored) if codes_match(stored, code.as_str()) => {
                    tracing::info!(
                        phone = %phone.masked(),
                        event = "verification_recheck",
                        attempt_id = %attempt.id,
                        "Repeated check of a verified attempt"
                    );
                    self.apply_verified(&phone, acting_user).await?;
                    Ok(CheckOutcome {
                        phone: phone.to_string(),
                        verified: true,
                    })
                }
                _ => Err(VerificationError::InvalidCode {
                    remaining_attempts: Some(attempt.remaining_attempts(self.config.max_attempts)),
                }
                .into()),
            };
        }

        if attempt.is_expired_at(now) {
            tracing::info!(phone = %phone.masked(), event = "verification_expired", "Verification attempt expired");
            return Err(VerificationError::NotFoundOrExpired.into());
        }

        if !attempt.can_attempt(self.config.max_attempts) {
            tracing::warn!(
                phone = %phone.masked(),
                event = "max_attempts_exceeded",
                attempts = attempt.attempts,
                "Verification attempt budget exhausted"
            );
            return Err(VerificationError::MaxAttemptsExceeded.into());
        }

        attempt.increment_attempts();
        self.verification_repository.update(&attempt).await?;

        let matched = match attempt.channel {
            VerificationChannel::LocalSms | VerificationChannel::TestPhone => stored_code_matches(&attempt, &code),
            VerificationChannel::Provider => self.check_with_provider(&phone, &code, &attempt).await?,
        };

        if !matched {
            let remaining = attempt.remaining_attempts(self.config.max_attempts);
            tracing::info!(
                phone = %phone.masked(),
                event = "verification_failed",
                remaining_attempts = remaining,
                "Invalid verification code submitted"
            );
            return Err(VerificationError::InvalidCode {
                remaining_attempts: Some(remaining),
            }
            .into());
        }

        attempt.mark_verified(code.as_str());
        self.verification_repository.update(&attempt).await?;
        self.apply_verified(&phone, acting_user).await?;

        tracing::info!(
            phone = %phone.masked(),
            event = "verification_succeeded",
            attempt_id = %attempt.id,
            channel = %attempt.channel,
            "Phone number verified"
        );

        Ok(CheckOutcome {
            phone: phone.to_string(),
            verified: true,
        })
    }

    /// Current verification flag for a user
    pub async fn status(&self, user_id: Uuid) -> DomainResult<VerificationStatus> {
        let profile = self.profile_repository.find_by_id(user_id).await?;
        Ok(match profile {
            Some(profile) => VerificationStatus {
                phone_verified: profile.phone_verified,
                phone: profile.phone,
            },
            None => VerificationStatus {
                phone_verified: false,
                phone: None,
            },
        })
    }

    /// Generate a code locally and deliver it as a plain SMS
    async fn send_local_code(
        &self,
        phone: &PhoneNumber,
        acting_user: Option<Uuid>,
        provider_error: SmsProviderError,
    ) -> DomainResult<SendOutcome> {
        let code = VerificationAttempt::generate_code();
        let body = self.config.render_sms(&code);

        let message_id = self
            .sms_provider
            .send_message(phone.as_str(), &body)
            .await
            .map_err(|fallback_error| {
                tracing::error!(
                    phone = %phone.masked(),
                    event = "sms_delivery_failed",
                    provider_error = %provider_error,
                    fallback_error = %fallback_error,
                    "Verification SMS could not be delivered"
                );
                VerificationError::DeliveryFailed {
                    detail: format!("{}; fallback: {}", provider_error, fallback_error),
                }
            })?;

        let attempt = self.new_attempt(phone, acting_user, Some(code), VerificationChannel::LocalSms);
        let attempt = self.verification_repository.create(&attempt).await?;

        tracing::info!(
            phone = %phone.masked(),
            event = "local_code_sent",
            message_id = %message_id,
            attempt_id = %attempt.id,
            "Verification code sent through fallback SMS"
        );
        Ok(self.send_outcome(&attempt, "pending", false))
    }

    async fn check_test_phone(
        &self,
        phone: &PhoneNumber,
        code: &SubmittedCode,
        expected: &str,
        acting_user: Option<Uuid>,
    ) -> DomainResult<CheckOutcome> {
        let universal_match = self
            .config
            .universal_test_code
            .as_deref()
            .is_some_and(|universal| codes_match(universal, code.as_str()));

        if !codes_match(expected, code.as_str()) && !universal_match {
            tracing::info!(phone = %phone.masked(), event = "test_phone_check_failed", "Wrong code for test phone");
            return Err(VerificationError::InvalidCode {
                remaining_attempts: None,
            }
            .into());
        }

        if let Some(mut attempt) = self
            .verification_repository
            .find_latest_by_phone(phone.as_str())
            .await?
        {
            if !attempt.verified {
                attempt.mark_verified(code.as_str());
                self.verification_repository.update(&attempt).await?;
            }
        }

        self.apply_verified(phone, acting_user).await?;
        tracing::info!(phone = %phone.masked(), event = "test_phone_verified", "Test phone verified");

        Ok(CheckOutcome {
            phone: phone.to_string(),
            verified: true,
        })
    }

    /// Ask the provider about a provider-managed attempt
    ///
    /// Returns whether the code matched; terminal provider answers become
    /// verification errors.
    async fn check_with_provider(
        &self,
        phone: &PhoneNumber,
        code: &SubmittedCode,
        attempt: &VerificationAttempt,
    ) -> DomainResult<bool> {
        match self
            .sms_provider
            .check_verification(phone.as_str(), code.as_str())
            .await
        {
            Ok(ProviderCheck::Approved) => Ok(true),
            Ok(ProviderCheck::NotApproved { status }) => {
                tracing::debug!(phone = %phone.masked(), status = %status, "Provider did not approve code");
                Ok(false)
            }
            Err(SmsProviderError::Exhausted) => Err(VerificationError::MaxAttemptsExceeded.into()),
            Err(SmsProviderError::NotFound) => Err(VerificationError::NotFoundOrExpired.into()),
            Err(error) => {
                tracing::warn!(
                    phone = %phone.masked(),
                    event = "provider_check_failed",
                    error = %error,
                    "Provider check failed, using local record"
                );
                match attempt.code {
                    Some(_) => Ok(stored_code_matches(attempt, code)),
                    None => Err(VerificationError::ProviderUnavailable {
                        detail: error.to_string(),
                    }
                    .into()),
                }
            }
        }
    }

    /// Raise `phone_verified` on the relevant profile(s)
    async fn apply_verified(&self, phone: &PhoneNumber, acting_user: Option<Uuid>) -> DomainResult<()> {
        let result = match acting_user {
            Some(user_id) => self
                .profile_repository
                .mark_verified_for_user(user_id, phone.as_str())
                .await
                .map(|_| 1),
            None => self.profile_repository.mark_verified_by_phone(phone.as_str()).await,
        };

        match result {
            Ok(updated) => {
                tracing::debug!(phone = %phone.masked(), profiles = updated, "Profile verification flag applied");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    phone = %phone.masked(),
                    event = "profile_update_failed",
                    error = %e,
                    "Attempt verified but profile update failed"
                );
                Err(DomainError::Internal {
                    message: format!("Failed to update profile: {}", e),
                })
            }
        }
    }

    fn new_attempt(
        &self,
        phone: &PhoneNumber,
        acting_user: Option<Uuid>,
        code: Option<String>,
        channel: VerificationChannel,
    ) -> VerificationAttempt {
        VerificationAttempt::new(phone.as_str(), acting_user, code, channel, self.config.code_ttl_minutes)
    }

    fn send_outcome(&self, attempt: &VerificationAttempt, status: &str, is_test_phone: bool) -> SendOutcome {
        SendOutcome {
            phone: attempt.phone.clone(),
            status: status.to_string(),
            channel: attempt.channel,
            is_test_phone,
            expires_at: attempt.expires_at,
            resend_after: self.config.resend_cooldown_secs,
        }
    }
}

fn codes_match(expected: &str, submitted: &str) -> bool {
    constant_time_eq(expected.as_bytes(), submitted.as_bytes())
}

fn stored_code_matches(attempt: &VerificationAttempt, code: &SubmittedCode) -> bool {
    attempt
        .code
        .as_deref()
        .is_some_and(|stored| codes_match(stored, code.as_str()))
}
