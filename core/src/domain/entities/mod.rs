//! Domain entities representing core business objects.

pub mod profile;
pub mod token;
pub mod verification_attempt;


// Re-export commonly used types
pub use profile::UserProfile;
pub use token::Claims;
pub use verification_attempt::{
    VerificationAttempt, VerificationChannel, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES,
    MAX_ATTEMPTS,
};
