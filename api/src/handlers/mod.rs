pub mod error;

use actix_web::HttpRequest;
use uuid::Uuid;

/// Request id from `X-Request-Id`, generated when the client sent none
pub fn request_id(req: &HttpRequest) -> String {
    req.headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
