//! Capability-gated content. The gate has already admitted the caller.

use axum::Extension;

use crate::context::CallerContext;

/// GET /user (capability `user`)
pub async fn user_content(Extension(caller): Extension<CallerContext>) -> &'static str {
    tracing::debug!(username = caller.username(), "serving user content");
    "User content"
}

/// GET /admin (capability `admin`)
pub async fn admin_content(Extension(caller): Extension<CallerContext>) -> &'static str {
    tracing::debug!(username = caller.username(), "serving admin content");
    "Admin content"
}
