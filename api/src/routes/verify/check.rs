use actix_web::{web, HttpRequest, HttpResponse};
use kh_core::repositories::{ProfileRepository, VerificationRepository};
use kh_core::services::verification::SmsProvider;
use kh_shared::utils::phone::mask_phone_number;
use validator::Validate;

use super::AppState;
use crate::dto::{CheckCodeRequest, CheckCodeResponse};
use crate::handlers::error::{error_status, handle_check_error, validation_failure};
use crate::handlers::request_id;
use crate::i18n::{language_from_request, success_message};
use crate::middleware::OptionalAuth;

/// Handler for `POST /api/verify/check` and `POST /api/account/verify/check`
///
/// Every failure answers `{ "success": false, "verified": false, ... }`;
/// a wrong code also reports `remainingAttempts`.
pub async fn check_code<P, V, R>(
    req: HttpRequest,
    state: web::Data<AppState<P, V, R>>,
    auth: OptionalAuth,
    request: web::Json<CheckCodeRequest>,
) -> HttpResponse
where
    P: SmsProvider + 'static,
    V: VerificationRepository + 'static,
    R: ProfileRepository + 'static,
{
    let request_id = request_id(&req);
    let lang = language_from_request(&req);
    let request = request.into_inner();

    if let Err(errors) = request.validate() {
        log::warn!("[{}] Validation failed for check_code request: {}", request_id, errors);
        return handle_check_error(&validation_failure(&errors), lang);
    }

    match state
        .verification_service
        .check(&request.phone_number, &request.code, auth.user_id())
        .await
    {
        Ok(outcome) => {
            log::info!(
                "[{}] Phone {} verified",
                request_id,
                mask_phone_number(&outcome.phone)
            );
            HttpResponse::Ok().json(CheckCodeResponse {
                success: true,
                verified: outcome.verified,
                message: success_message("PHONE_VERIFIED", lang),
            })
        }
        Err(error) => {
            if error_status(&error).is_server_error() {
                log::error!("[{}] Verification check failed: {}", request_id, error);
            } else {
                log::info!(
                    "[{}] Verification check rejected for {}: {}",
                    request_id,
                    mask_phone_number(&request.phone_number),
                    error.error_code()
                );
            }
            handle_check_error(&error, lang)
        }
    }
}
