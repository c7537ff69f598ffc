//! sqlexpr diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the type
//! resolution and evaluation crates: error codes, severities and diagnostic
//! reporting for the context's warning channel.

mod error;
mod error_code;

pub use error::*;
pub use error_code::*;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, ExprError>;
