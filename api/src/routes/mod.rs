//! HTTP route handlers
//!
//! - `health` - liveness probe
//! - `verify` - phone verification send/check and the account status view

pub mod health;
pub mod verify;
