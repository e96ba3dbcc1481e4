//! Registration and login. Both are public and do their own checks.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    Json,
};

use rolegate_core::FieldErrors;

use crate::app::dto::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

/// Turn an unreadable JSON body into a field error on `body`.
pub(crate) fn body_or_validation<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let mut errors = FieldErrors::new();
            errors.push("body", rejection.body_text());
            Err(ApiError::Validation(errors))
        }
    }
}

/// POST /register
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let registration = body_or_validation(payload)?.validate()?;

    services.register(registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered",
        }),
    ))
}

/// POST /login
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let login = body_or_validation(payload)?.validate()?;

    let token = services.login(login).await?;

    Ok(Json(TokenResponse { token }))
}
