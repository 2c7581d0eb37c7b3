//! Common utility functions

pub mod code;
pub mod phone;

pub use code::*;
pub use phone::*;
