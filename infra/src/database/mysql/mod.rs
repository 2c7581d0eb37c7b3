//! MySQL repository implementations

pub mod profile_repository_impl;
pub mod verification_repository_impl;

pub use profile_repository_impl::MySqlProfileRepository;
pub use verification_repository_impl::MySqlVerificationRepository;
