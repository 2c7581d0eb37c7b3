//! HTTP transport for phone verification
//!
//! Library half of `kh_api`, shared by the binary and the integration tests.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod routes;

pub use app::{configure_routes, create_app};
pub use routes::verify::AppState;
