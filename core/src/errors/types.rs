//! Error types for verification, validation, authentication and the SMS provider
//!
//! Display strings carry both languages (English | Arabic) so log lines stay
//! readable for either team; client-facing messages come from the API layer.

use thiserror::Error;

/// Outcomes of `send`/`check` that are reported to the client as failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Invalid verification code | رمز التحقق غير صحيح")]
    InvalidCode { remaining_attempts: Option<i32> },

    #[error("Verification not found or expired. Please request a new code | لم يتم العثور على طلب التحقق أو انتهت صلاحيته")]
    NotFoundOrExpired,

    #[error("Maximum attempts exceeded. Please request a new code | تم تجاوز الحد الأقصى للمحاولات")]
    MaxAttemptsExceeded,

    #[error("Failed to deliver verification SMS: {detail} | تعذر إرسال رسالة التحقق")]
    DeliveryFailed { detail: String },

    #[error("SMS provider unavailable: {detail} | خدمة الرسائل غير متاحة حاليا")]
    ProviderUnavailable { detail: String },
}

impl VerificationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            VerificationError::InvalidCode { .. } => "INVALID_VERIFICATION_CODE",
            VerificationError::NotFoundOrExpired => "VERIFICATION_NOT_FOUND_OR_EXPIRED",
            VerificationError::MaxAttemptsExceeded => "MAX_ATTEMPTS_EXCEEDED",
            VerificationError::DeliveryFailed { .. } => "SMS_DELIVERY_FAILED",
            VerificationError::ProviderUnavailable { .. } => "SMS_PROVIDER_UNAVAILABLE",
        }
    }
}

/// Validation errors with bilingual messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid phone number format | صيغة رقم الهاتف غير صحيحة")]
    InvalidPhoneFormat,

    #[error("Invalid verification code format | صيغة رمز التحقق غير صحيحة")]
    InvalidCodeFormat,

    #[error("Field required: {field} | حقل مطلوب: {field}")]
    RequiredField { field: String },
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidPhoneFormat => "INVALID_PHONE_FORMAT",
            ValidationError::InvalidCodeFormat => "INVALID_CODE_FORMAT",
            ValidationError::RequiredField { .. } => "VALIDATION_ERROR",
        }
    }
}

/// Bearer token errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing bearer token | رمز الدخول مفقود")]
    MissingToken,

    #[error("Invalid bearer token | رمز الدخول غير صالح")]
    InvalidToken,

    #[error("Token expired | انتهت صلاحية رمز الدخول")]
    TokenExpired,

    #[error("Invalid token claims | بيانات رمز الدخول غير صالحة")]
    InvalidClaims,
}

/// Errors reported by an SMS provider client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmsProviderError {
    /// Network failure, timeout or an unreadable response
    #[error("SMS provider transport error: {message}")]
    Transport { message: String },

    /// The provider answered with a 5xx
    #[error("SMS provider server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The provider refused the request (4xx other than the cases below)
    #[error("SMS provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// No pending verification exists at the provider
    #[error("Verification not found at SMS provider")]
    NotFound,

    /// The provider's own attempt limit was reached
    #[error("SMS provider attempt limit reached")]
    Exhausted,

    #[error("SMS provider misconfigured: {message}")]
    Configuration { message: String },
}

impl SmsProviderError {
    /// Failures worth retrying with backoff
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SmsProviderError::Transport { .. } | SmsProviderError::Server { .. }
        )
    }
}
