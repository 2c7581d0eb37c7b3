//! CORS middleware configuration for cross-origin requests.
//!
//! Development is permissive. Production only admits the configured origins
//! plus the mobile app webview schemes.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use kh_shared::config::{Environment, ServerConfig};

/// Creates a CORS middleware instance configured for the current environment.
pub fn create_cors(environment: Environment, config: &ServerConfig) -> Cors {
    if environment.is_production() {
        create_production_cors(config)
    } else {
        create_development_cors(config.cors_max_age)
    }
}

fn create_development_cors(max_age: usize) -> Cors {
    log::info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::USER_AGENT,
            header::HeaderName::from_static("x-requested-with"),
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(max_age)
        .supports_credentials()
}

fn create_production_cors(config: &ServerConfig) -> Cors {
    log::info!("Configuring CORS for production environment");

    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(config.cors_max_age);

    for origin in &config.allowed_origins {
        log::info!("Adding allowed origin: {}", origin);
        cors = cors.allowed_origin(origin);
    }

    // Mobile webviews
    cors.allowed_origin("capacitor://localhost")
        .allowed_origin("ionic://localhost")
        .allowed_origin("https://localhost")
}
