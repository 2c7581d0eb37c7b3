//! Verification attempt entity for SMS-based phone verification.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of checks allowed against one attempt
pub const MAX_ATTEMPTS: i32 = 3;

/// Length of locally generated verification codes
pub const CODE_LENGTH: usize = 6;

/// Default lifetime of an attempt (10 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 10;

/// How the code for an attempt was delivered, and therefore how it is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationChannel {
    /// The SMS provider generated and holds the code
    Provider,
    /// The code was generated here and sent as a plain SMS
    LocalSms,
    /// Configured test phone with a fixed code; nothing was sent
    TestPhone,
}

impl VerificationChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationChannel::Provider => "provider",
            VerificationChannel::LocalSms => "local_sms",
            VerificationChannel::TestPhone => "test_phone",
        }
    }
}

impl fmt::Display for VerificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "provider" => Ok(VerificationChannel::Provider),
            "local_sms" => Ok(VerificationChannel::LocalSms),
            "test_phone" => Ok(VerificationChannel::TestPhone),
            other => Err(format!("unknown verification channel '{}'", other)),
        }
    }
}

/// One outstanding code delivery awaiting a matching check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationAttempt {
    /// Unique identifier for the attempt
    pub id: Uuid,

    /// Acting user for the authenticated flow
    pub user_id: Option<Uuid>,

    /// Normalized E.164 phone number
    pub phone: String,

    /// Expected code. `None` for provider-managed attempts until approved.
    pub code: Option<String>,

    pub channel: VerificationChannel,

    /// Number of checks made so far
    pub attempts: i32,

    pub verified: bool,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

impl VerificationAttempt {
    /// Creates a new attempt that expires `ttl_minutes` from now
    pub fn new(
        phone: impl Into<String>,
        user_id: Option<Uuid>,
        code: Option<String>,
        channel: VerificationChannel,
        ttl_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            phone: phone.into(),
            code,
            channel,
            attempts: 0,
            verified: false,
            created_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
        }
    }

    /// Generates a 6-digit code using the OS CSPRNG
    pub fn generate_code() -> String {
        let value: u32 = OsRng.gen_range(0..1_000_000);
        format!("{:0width$}", value, width = CODE_LENGTH)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether `acting_user` may act on this attempt
    ///
    /// Anonymous callers and attempts started without a user always match.
    pub fn belongs_to(&self, acting_user: Option<Uuid>) -> bool {
        match (self.user_id, acting_user) {
            (Some(owner), Some(user)) => owner == user,
            _ => true,
        }
    }

    /// Whether another check may be made under `max_attempts`
    pub fn can_attempt(&self, max_attempts: i32) -> bool {
        self.attempts < max_attempts
    }

    pub fn remaining_attempts(&self, max_attempts: i32) -> i32 {
        (max_attempts - self.attempts).max(0)
    }

    pub fn increment_attempts(&mut self) {
        self.attempts += 1;
    }

    /// Marks the attempt verified and records the accepted code
    pub fn mark_verified(&mut self, code: &str) {
        self.verified = true;
        self.code = Some(code.to_string());
    }
}
