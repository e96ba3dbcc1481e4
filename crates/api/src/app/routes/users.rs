//! Identity administration.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    Json,
};

use crate::app::dto::{RoleUpdatedResponse, UpdateRoleRequest};
use crate::app::errors::ApiError;
use crate::app::routes::accounts::body_or_validation;
use crate::app::services::AppServices;
use crate::context::CallerContext;

/// PUT /user/:username/role (capability `admin`)
///
/// Tokens already issued to `username` keep their old role until they expire.
pub async fn update_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(username): Path<String>,
    payload: Result<Json<UpdateRoleRequest>, JsonRejection>,
) -> Result<Json<RoleUpdatedResponse>, ApiError> {
    let role = body_or_validation(payload)?.validate()?;

    services.reassign_role(&username, role)?;
    tracing::info!(by = caller.username(), %username, role = %role, "role updated");

    Ok(Json(RoleUpdatedResponse {
        message: "User role updated",
        username,
        role,
    }))
}
