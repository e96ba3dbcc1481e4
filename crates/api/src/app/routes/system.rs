use axum::{http::StatusCode, response::IntoResponse, Json};

use rolegate_auth::role_table;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /public
pub async fn public_content() -> &'static str {
    "Public content"
}

/// GET /roles - the static role table
pub async fn roles() -> impl IntoResponse {
    Json(serde_json::json!({ "roles": role_table() }))
}
