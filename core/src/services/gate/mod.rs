//! Client session gate
//!
//! Tracks where a client session stands on the way to the main application:
//! `Unauthenticated → PhoneUnverified → PhoneVerified`. Route guards ask the
//! gate whether a path may be shown or where to redirect instead.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Routes reachable without a verified phone
pub const PUBLIC_ROUTES: [&str; 4] = ["/", "/signin", "/signup", "/verify-phone"];

pub const SIGN_IN_ROUTE: &str = "/signin";
pub const VERIFY_PHONE_ROUTE: &str = "/verify-phone";

/// Seconds the resend affordance stays disabled after a send
pub const RESEND_COOLDOWN_SECONDS: i64 = 60;

/// Signed-in user as seen by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Uuid,
    pub phone_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Unauthenticated,
    PhoneUnverified { user_id: Uuid },
    PhoneVerified { user_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(&'static str),
}

/// Session-scoped gate state machine
#[derive(Debug, Clone)]
pub struct SessionGate {
    state: GateState,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn is_phone_verified(&self) -> bool {
        matches!(self.state, GateState::PhoneVerified { .. })
    }

    /// Enter the session, skipping verification when the profile already has it
    pub fn sign_in(&mut self, user: &SessionUser) {
        self.state = if user.phone_verified {
            GateState::PhoneVerified { user_id: user.id }
        } else {
            GateState::PhoneUnverified { user_id: user.id }
        };
    }

    /// Apply the result of a code check. Only a successful check moves the gate.
    pub fn apply_check_result(&mut self, verified: bool) {
        if let GateState::PhoneUnverified { user_id } = self.state {
            if verified {
                self.state = GateState::PhoneVerified { user_id };
            }
        }
    }

    /// Re-apply the server's view of the flag; can demote a revoked session
    pub fn refresh_from_server(&mut self, phone_verified: bool) {
        self.state = match self.state {
            GateState::Unauthenticated => GateState::Unauthenticated,
            GateState::PhoneUnverified { user_id } | GateState::PhoneVerified { user_id } => {
                if phone_verified {
                    GateState::PhoneVerified { user_id }
                } else {
                    GateState::PhoneUnverified { user_id }
                }
            }
        };
    }

    pub fn sign_out(&mut self) {
        self.state = GateState::Unauthenticated;
    }

    /// Decide whether `path` may be rendered
    pub fn route_access(&self, path: &str) -> RouteDecision {
        if is_public_route(path) {
            return RouteDecision::Allow;
        }
        match self.state {
            GateState::Unauthenticated => RouteDecision::Redirect(SIGN_IN_ROUTE),
            GateState::PhoneUnverified { .. } => RouteDecision::Redirect(VERIFY_PHONE_ROUTE),
            GateState::PhoneVerified { .. } => RouteDecision::Allow,
        }
    }
}

/// Public routes match exactly, ignoring a trailing slash and query string
pub fn is_public_route(path: &str) -> bool {
    let path = path.split(|c| c == '?' || c == '#').next().unwrap_or("");
    let trimmed = match path.trim_end_matches('/') {
        "" => "/",
        p => p,
    };
    PUBLIC_ROUTES.contains(&trimmed)
}

/// Resend countdown shown on the verification screen
#[derive(Debug, Clone)]
pub struct ResendCountdown {
    last_sent_at: Option<DateTime<Utc>>,
    cooldown_seconds: i64,
}

impl Default for ResendCountdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ResendCountdown {
    pub fn new() -> Self {
        Self::with_cooldown(RESEND_COOLDOWN_SECONDS)
    }

    pub fn with_cooldown(cooldown_seconds: i64) -> Self {
        Self {
            last_sent_at: None,
            cooldown_seconds,
        }
    }

    pub fn record_send(&mut self, at: DateTime<Utc>) {
        self.last_sent_at = Some(at);
    }

    /// Whole seconds left before a resend is allowed
    pub fn remaining(&self, now: DateTime<Utc>) -> i64 {
        match self.last_sent_at {
            Some(sent) => {
                let unlock = sent + Duration::seconds(self.cooldown_seconds);
                (unlock - now).num_seconds().max(0)
            }
            None => 0,
        }
    }

    pub fn can_resend(&self, now: DateTime<Utc>) -> bool {
        self.remaining(now) == 0
    }
}
