//! Domain error model.

use thiserror::Error;

use crate::FieldErrors;

/// Result type used across the credential and validation layers.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Token and authorization failures have their own types in `rolegate-auth`;
/// this enum covers identities and input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more input fields failed validation.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// The username is already registered (exact, case-sensitive match).
    #[error("username '{0}' is already registered")]
    DuplicateUsername(String),

    /// Unknown username or wrong password. The two cases are deliberately
    /// reported identically.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user '{0}' not found")]
    UserNotFound(String),

    /// A role name outside the closed role set.
    #[error("invalid role '{0}'")]
    InvalidRole(String),

    /// Anything unanticipated (poisoned lock, broken hash record, ...).
    /// The message is for server-side logs only.
    #[error("unexpected fault: {0}")]
    Unexpected(String),
}

impl DomainError {
    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::DuplicateUsername(username.into())
    }

    pub fn user_not_found(username: impl Into<String>) -> Self {
        Self::UserNotFound(username.into())
    }

    pub fn invalid_role(role: impl Into<String>) -> Self {
        Self::InvalidRole(role.into())
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }
}

impl From<FieldErrors> for DomainError {
    fn from(value: FieldErrors) -> Self {
        Self::Validation(value)
    }
}
