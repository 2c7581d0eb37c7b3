use actix_web::{web, HttpRequest, HttpResponse};
use kh_core::repositories::{ProfileRepository, VerificationRepository};
use kh_core::services::verification::SmsProvider;

use super::AppState;
use crate::dto::VerificationStatusResponse;
use crate::handlers::error::handle_domain_error;
use crate::handlers::request_id;
use crate::i18n::language_from_request;
use crate::middleware::AuthContext;

/// Handler for `GET /api/account/verification-status`
///
/// Server-side view of the caller's `phone_verified` flag, used by clients to
/// re-validate a cached session.
pub async fn verification_status<P, V, R>(
    req: HttpRequest,
    state: web::Data<AppState<P, V, R>>,
    auth: AuthContext,
) -> HttpResponse
where
    P: SmsProvider + 'static,
    V: VerificationRepository + 'static,
    R: ProfileRepository + 'static,
{
    match state.verification_service.status(auth.user_id).await {
        Ok(status) => HttpResponse::Ok().json(VerificationStatusResponse {
            success: true,
            phone_verified: status.phone_verified,
            phone: status.phone,
        }),
        Err(error) => {
            log::error!(
                "[{}] Failed to load verification status for {}: {}",
                request_id(&req),
                auth.user_id,
                error
            );
            handle_domain_error(&error, language_from_request(&req))
        }
    }
}
