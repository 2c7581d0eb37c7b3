//! Value objects representing immutable domain concepts.

pub mod code;
pub mod phone;

// Re-export commonly used types
pub use code::SubmittedCode;
pub use phone::PhoneNumber;
