//! Domain/auth failures → HTTP responses.
//!
//! Every error a handler or the gate can produce ends up here, so the
//! status mapping lives in one place.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use rolegate_auth::{AuthzError, Rejection, TokenError};
use rolegate_core::{DomainError, FieldErrors};

/// Generic body for anything unanticipated; details stay in the server log.
pub const UNEXPECTED_MESSAGE: &str = "Something broke!";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("username '{0}' is already registered")]
    DuplicateUsername(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    /// No usable identity: missing, malformed, badly signed or expired token.
    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("unexpected fault: {0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::UserNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DuplicateUsername(_) => StatusCode::CONFLICT,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => ApiError::Validation(errors),
            DomainError::DuplicateUsername(username) => ApiError::DuplicateUsername(username),
            DomainError::InvalidCredentials => ApiError::InvalidCredentials,
            DomainError::UserNotFound(username) => ApiError::UserNotFound(username),
            DomainError::InvalidRole(role) => {
                let mut errors = FieldErrors::new();
                errors.push("role", format!("Invalid role '{role}'"));
                ApiError::Validation(errors)
            }
            DomainError::Unexpected(msg) => ApiError::Unexpected(msg),
        }
    }
}

impl From<Rejection> for ApiError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::MissingToken => ApiError::Unauthenticated("No token provided"),
            Rejection::Token(TokenError::Expired) => ApiError::Unauthenticated("Token expired"),
            Rejection::Token(TokenError::Invalid) => ApiError::Unauthenticated("Invalid token"),
            Rejection::Token(TokenError::Signing(msg)) => ApiError::Unexpected(msg),
            Rejection::Denied {
                error: AuthzError::Unauthenticated,
                ..
            } => ApiError::Unauthenticated("No token provided"),
            Rejection::Denied {
                claims,
                error: AuthzError::Forbidden(capability),
            } => ApiError::Forbidden(format!("{} ({}) lacks capability '{capability}'", claims.sub, claims.role)),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        Rejection::Token(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(errors) => (
                status,
                axum::Json(json!({
                    "error": "validation_error",
                    "message": "request validation failed",
                    "errors": errors,
                })),
            )
                .into_response(),
            ApiError::DuplicateUsername(username) => json_error(
                status,
                "duplicate_username",
                format!("username '{username}' is already registered"),
            ),
            ApiError::InvalidCredentials => json_error(status, "invalid_credentials", "Invalid credentials"),
            ApiError::Unauthenticated(message) => json_error(status, "unauthenticated", message),
            ApiError::Forbidden(detail) => {
                tracing::debug!(%detail, "request forbidden");
                json_error(status, "forbidden", "Forbidden")
            }
            ApiError::UserNotFound(_) => json_error(status, "not_found", "User not found"),
            ApiError::Unexpected(detail) => {
                tracing::error!(%detail, "unexpected fault");
                unexpected_response()
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// The one body every unanticipated failure gets.
pub fn unexpected_response() -> Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", UNEXPECTED_MESSAGE)
}
