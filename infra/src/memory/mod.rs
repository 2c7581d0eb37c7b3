//! In-memory repositories
//!
//! Used by the development server (`STORAGE_BACKEND=memory`) and the
//! integration tests. State lives for the life of the process.

pub mod profile;
pub mod verification;

pub use profile::InMemoryProfileRepository;
pub use verification::InMemoryVerificationRepository;
