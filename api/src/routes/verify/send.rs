use actix_web::{web, HttpRequest, HttpResponse};
use kh_core::repositories::{ProfileRepository, VerificationRepository};
use kh_core::services::verification::SmsProvider;
use kh_shared::utils::phone::mask_phone_number;
use validator::Validate;

use super::AppState;
use crate::dto::{SendCodeRequest, SendCodeResponse};
use crate::handlers::error::{error_status, handle_domain_error, validation_failure};
use crate::handlers::request_id;
use crate::i18n::{language_from_request, success_message};
use crate::middleware::OptionalAuth;

/// Handler for `POST /api/verify/send` and `POST /api/account/verify/send`
///
/// # Request Body
///
/// ```json
/// { "phoneNumber": "+966501234567" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "status": "pending",
///     "isTestPhone": false,
///     "message": "تم إرسال رمز التحقق إلى هاتفك",
///     "expiresAt": "2024-06-01T10:10:00Z",
///     "resendAfter": 60
/// }
/// ```
///
/// ## Errors
/// - 400 `INVALID_PHONE_FORMAT`
/// - 500 `SMS_DELIVERY_FAILED` when both the provider and the fallback SMS fail
pub async fn send_code<P, V, R>(
    req: HttpRequest,
    state: web::Data<AppState<P, V, R>>,
    auth: OptionalAuth,
    request: web::Json<SendCodeRequest>,
) -> HttpResponse
where
    P: SmsProvider + 'static,
    V: VerificationRepository + 'static,
    R: ProfileRepository + 'static,
{
    let request_id = request_id(&req);
    let lang = language_from_request(&req);
    let request = request.into_inner();

    log::info!(
        "[{}] Processing send_code request for phone: {}",
        request_id,
        mask_phone_number(&request.phone_number)
    );

    if let Err(errors) = request.validate() {
        log::warn!("[{}] Validation failed for send_code request: {}", request_id, errors);
        return handle_domain_error(&validation_failure(&errors), lang);
    }

    match state
        .verification_service
        .send(&request.phone_number, auth.user_id())
        .await
    {
        Ok(outcome) => {
            log::info!(
                "[{}] Verification code dispatched to {} via {} (test phone: {})",
                request_id,
                mask_phone_number(&outcome.phone),
                outcome.channel,
                outcome.is_test_phone
            );

            let message_key = if outcome.is_test_phone {
                "CODE_SENT_TEST_PHONE"
            } else {
                "CODE_SENT"
            };
            HttpResponse::Ok().json(SendCodeResponse {
                success: true,
                status: outcome.status,
                is_test_phone: outcome.is_test_phone,
                message: success_message(message_key, lang),
                expires_at: outcome.expires_at,
                resend_after: outcome.resend_after,
            })
        }
        Err(error) => {
            if error_status(&error).is_server_error() {
                log::error!("[{}] Failed to send verification code: {}", request_id, error);
            } else {
                log::warn!("[{}] Send rejected: {}", request_id, error.error_code());
            }
            handle_domain_error(&error, lang)
        }
    }
}
