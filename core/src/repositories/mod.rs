//! Repository interfaces for persistence, implemented in the infrastructure crate.

pub mod profile;
pub mod verification;

pub use profile::ProfileRepository;
pub use verification::VerificationRepository;
