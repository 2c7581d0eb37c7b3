//! Business services containing domain logic and use cases.

pub mod gate;
pub mod verification;

// Re-export commonly used types
pub use gate::{GateState, ResendCountdown, RouteDecision, SessionGate, SessionUser};
pub use verification::{
    CheckOutcome, ProviderCheck, ProviderDispatch, SendOutcome, SmsProvider, VerificationService,
    VerificationStatus,
};
