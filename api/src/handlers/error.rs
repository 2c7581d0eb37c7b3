//! Domain error to HTTP response translation
//!
//! Status codes and localized texts come from the message catalog, keyed by
//! the error's machine code.

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse,
};
use kh_core::errors::{DomainError, ValidationError, VerificationError};
use validator::ValidationErrors;

use crate::dto::ErrorResponse;
use crate::i18n::{error_message, language_from_request, Language};

/// HTTP status for a domain error
pub fn error_status(error: &DomainError) -> StatusCode {
    error_message(error.error_code(), Language::default())
        .and_then(|(_, status)| StatusCode::from_u16(status).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Localized body for a domain error
pub fn error_body(error: &DomainError, lang: Language) -> ErrorResponse {
    let code = error.error_code();
    let message = error_message(code, lang)
        .map(|(text, _)| text)
        .unwrap_or_else(|| error.to_string());

    let body = ErrorResponse::new(code, message);
    match error {
        DomainError::Verification(VerificationError::DeliveryFailed { detail })
        | DomainError::Verification(VerificationError::ProviderUnavailable { detail }) => {
            body.with_details(detail.clone())
        }
        DomainError::Sms(e) => body.with_details(e.to_string()),
        _ => body,
    }
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError, lang: Language) -> HttpResponse {
    HttpResponse::build(error_status(error)).json(error_body(error, lang))
}

/// Same as [`handle_domain_error`] with the check-specific fields
pub fn handle_check_error(error: &DomainError, lang: Language) -> HttpResponse {
    let remaining = match error {
        DomainError::Verification(VerificationError::InvalidCode { remaining_attempts }) => *remaining_attempts,
        _ => None,
    };
    HttpResponse::build(error_status(error)).json(error_body(error, lang).for_check(remaining))
}

/// 401 with the localized `UNAUTHORIZED` body
pub fn unauthorized(lang: Language) -> HttpResponse {
    handle_domain_error(&DomainError::Unauthorized, lang)
}

/// Map request validation failures onto the field that failed
pub fn validation_failure(errors: &ValidationErrors) -> DomainError {
    let fields = errors.field_errors();
    if fields.contains_key("phone_number") {
        ValidationError::InvalidPhoneFormat.into()
    } else if fields.contains_key("code") {
        ValidationError::InvalidCodeFormat.into()
    } else {
        DomainError::Validation {
            message: errors.to_string(),
        }
    }
}

/// Malformed JSON bodies answer with `VALIDATION_ERROR` instead of plain text
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let lang = language_from_request(req);
    log::warn!("Rejected request body on {}: {}", req.path(), err);

    let error = DomainError::Validation {
        message: err.to_string(),
    };
    InternalError::from_response(err, handle_domain_error(&error, lang)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kh_core::errors::{AuthError, SmsProviderError};

    #[test]
    fn test_error_statuses() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (ValidationError::InvalidPhoneFormat.into(), StatusCode::BAD_REQUEST),
            (ValidationError::InvalidCodeFormat.into(), StatusCode::BAD_REQUEST),
            (
                VerificationError::InvalidCode {
                    remaining_attempts: Some(2),
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (VerificationError::NotFoundOrExpired.into(), StatusCode::BAD_REQUEST),
            (VerificationError::MaxAttemptsExceeded.into(), StatusCode::TOO_MANY_REQUESTS),
            (
                VerificationError::DeliveryFailed {
                    detail: "down".to_string(),
                }
                .into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                VerificationError::ProviderUnavailable {
                    detail: "down".to_string(),
                }
                .into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AuthError::TokenExpired.into(), StatusCode::UNAUTHORIZED),
            (
                DomainError::Internal {
                    message: "db".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (SmsProviderError::Exhausted.into(), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (error, status) in cases {
            assert_eq!(error_status(&error), status, "{:?}", error);
        }
    }

    #[test]
    fn test_body_is_localized() {
        let error: DomainError = VerificationError::MaxAttemptsExceeded.into();

        let en = error_body(&error, Language::English);
        assert_eq!(en.code, "MAX_ATTEMPTS_EXCEEDED");
        assert!(en.error.starts_with("Maximum attempts exceeded"));
        assert!(!en.success);

        let ar = error_body(&error, Language::Arabic);
        assert_eq!(ar.code, en.code);
        assert_ne!(ar.error, en.error);
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let error = DomainError::Internal {
            message: "connection refused on 10.0.0.3".to_string(),
        };
        let body = error_body(&error, Language::English);
        assert!(body.details.is_none());
        assert!(!body.error.contains("10.0.0.3"));
    }

    #[test]
    fn test_delivery_failure_carries_detail() {
        let error: DomainError = VerificationError::DeliveryFailed {
            detail: "Twilio returned 503".to_string(),
        }
        .into();
        assert_eq!(
            error_body(&error, Language::English).details.as_deref(),
            Some("Twilio returned 503")
        );
    }
}
