//! JWT authentication middleware for the account endpoints.
//!
//! Access tokens are issued by the hosted auth platform and signed with a
//! shared HS256 secret. The middleware extracts the bearer token from the
//! Authorization header, validates signature, expiry, audience and issuer,
//! and injects an [`AuthContext`] into the request.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::{ACCEPT_LANGUAGE, AUTHORIZATION},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use kh_core::{domain::entities::token::Claims, errors::AuthError};
use kh_shared::config::AuthConfig;
use kh_shared::types::Language;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use crate::handlers::error::unauthorized;

/// User authentication context injected into requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// User ID extracted from the `sub` claim
    pub user_id: Uuid,
    /// Phone recorded by the auth platform, if any
    pub phone: Option<String>,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Result<Self, AuthError> {
        Ok(Self {
            user_id: claims.user_id()?,
            phone: claims.phone,
        })
    }
}

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    config: Arc<AuthConfig>,
}

impl JwtAuth {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            config: Arc::clone(&self.config),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    config: Arc<AuthConfig>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let verified = extract_bearer_token(&req)
                .ok_or(AuthError::MissingToken)
                .and_then(|token| verify_token(&token, &config));

            let auth_context = match verified {
                Ok(context) => context,
                Err(e) => {
                    log::warn!("Rejected request to {}: {}", req.path(), e);
                    let response = unauthorized(request_language(&req));
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            req.extensions_mut().insert(auth_context);
            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn request_language(req: &ServiceRequest) -> Language {
    req.headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(Language::from_accept_language)
        .unwrap_or_default()
}

/// Validate an HS256 token against the configured audience and issuer
pub fn verify_token(token: &str, config: &AuthConfig) -> Result<AuthContext, AuthError> {
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = config.leeway_seconds;
    validation.set_audience(&[config.audience.as_str()]);
    if let Some(issuer) = &config.issuer {
        validation.set_issuer(&[issuer.as_str()]);
    }

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    AuthContext::from_claims(token_data.claims)
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req.extensions().get::<AuthContext>().cloned().ok_or_else(|| {
            let lang = crate::i18n::language_from_request(req);
            InternalError::from_response(AuthError::MissingToken, unauthorized(lang)).into()
        });

        ready(result)
    }
}

/// Extractor for optional authentication
///
/// Public routes see `None`; routes behind [`JwtAuth`] see the caller.
pub struct OptionalAuth(pub Option<AuthContext>);

impl OptionalAuth {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|ctx| ctx.user_id)
    }
}

impl FromRequest for OptionalAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let auth = req.extensions().get::<AuthContext>().cloned();
        ready(Ok(OptionalAuth(auth)))
    }
}
