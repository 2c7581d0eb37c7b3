//! Application factory
//!
//! Builds the actix-web application around an already wired
//! [`AppState`]. Shared by the binary and the integration tests.

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, HttpResponse,
};
use kh_core::errors::DomainError;
use kh_core::repositories::{ProfileRepository, VerificationRepository};
use kh_core::services::verification::SmsProvider;
use kh_shared::config::AuthConfig;

use crate::handlers::error::{handle_domain_error, json_error_handler};
use crate::i18n::language_from_request;
use crate::middleware::JwtAuth;
use crate::routes::health::health_check;
use crate::routes::verify::{check_code, send_code, verification_status, AppState};

/// Request bodies are two short strings
const JSON_BODY_LIMIT: usize = 4096;

/// Create and configure the application with all dependencies
pub fn create_app<P, V, R>(
    app_state: web::Data<AppState<P, V, R>>,
    auth_config: AuthConfig,
    cors: Cors,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    P: SmsProvider + 'static,
    V: VerificationRepository + 'static,
    R: ProfileRepository + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(
            web::JsonConfig::default()
                .limit(JSON_BODY_LIMIT)
                .error_handler(json_error_handler),
        )
        // Logger outermost so rejected CORS requests are logged too
        .wrap(cors)
        .wrap(Logger::default())
        .configure(|cfg| configure_routes::<P, V, R>(cfg, auth_config))
        .default_service(web::route().to(not_found))
}

/// Register the verification routes
///
/// `/api/verify/*` is public; `/api/account/*` requires a bearer token.
pub fn configure_routes<P, V, R>(cfg: &mut web::ServiceConfig, auth_config: AuthConfig)
where
    P: SmsProvider + 'static,
    V: VerificationRepository + 'static,
    R: ProfileRepository + 'static,
{
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api")
            .service(
                web::scope("/verify")
                    .route("/send", web::post().to(send_code::<P, V, R>))
                    .route("/check", web::post().to(check_code::<P, V, R>)),
            )
            .service(
                web::scope("/account")
                    .wrap(JwtAuth::new(auth_config))
                    .route("/verify/send", web::post().to(send_code::<P, V, R>))
                    .route("/verify/check", web::post().to(check_code::<P, V, R>))
                    .route(
                        "/verification-status",
                        web::get().to(verification_status::<P, V, R>),
                    ),
            ),
    );
}

/// Default 404 handler
async fn not_found(req: actix_web::HttpRequest) -> HttpResponse {
    let error = DomainError::NotFound {
        resource: req.path().to_string(),
    };
    handle_domain_error(&error, language_from_request(&req))
}
