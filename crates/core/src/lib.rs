//! `rolegate-core`: domain error model and input validation primitives.
//!
//! This crate contains no I/O and knows nothing about HTTP or tokens.

pub mod error;
pub mod validation;

pub use error::{DomainError, DomainResult};
pub use validation::{FieldError, FieldErrors};
