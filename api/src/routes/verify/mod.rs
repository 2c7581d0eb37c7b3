//! Phone verification route handlers
//!
//! The same send/check handlers serve the public `/api/verify` scope and the
//! authenticated `/api/account` scope. Behind [`crate::middleware::JwtAuth`]
//! the caller's id is passed to the service so the flag lands on their profile.

pub mod check;
pub mod send;
pub mod status;

pub use check::check_code;
pub use send::send_code;
pub use status::verification_status;

use std::sync::Arc;

use kh_core::repositories::{ProfileRepository, VerificationRepository};
use kh_core::services::verification::{SmsProvider, VerificationService};

/// Application state that holds shared services
pub struct AppState<P, V, R>
where
    P: SmsProvider,
    V: VerificationRepository,
    R: ProfileRepository,
{
    pub verification_service: Arc<VerificationService<P, V, R>>,
}

impl<P, V, R> AppState<P, V, R>
where
    P: SmsProvider,
    V: VerificationRepository,
    R: ProfileRepository,
{
    pub fn new(verification_service: Arc<VerificationService<P, V, R>>) -> Self {
        Self { verification_service }
    }
}
