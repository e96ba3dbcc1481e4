use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use rolegate_auth::{Access, Capability, Rejection, TokenError, TokenValidator, admit, explain_authorization};

use crate::app::errors::ApiError;
use crate::context::CallerContext;

/// State for one access group: what it requires and how tokens are checked.
#[derive(Clone)]
pub struct GateState {
    pub access: Access,
    pub tokens: Arc<dyn TokenValidator>,
}

/// Identify, then authorize, then run the handler.
///
/// The caller is available to handlers as `Extension<CallerContext>`. It is
/// also copied onto the response, including a 403, so the request log can
/// attribute the request.
pub async fn gate(
    State(state): State<GateState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Access::Requires(required) = &state.access else {
        return next.run(req).await;
    };

    let admitted = match extract_bearer(req.headers()) {
        Ok(token) => admit(&state.access, Some(token), state.tokens.as_ref(), Utc::now()),
        Err(Bearer::Absent) => admit(&state.access, None, state.tokens.as_ref(), Utc::now()),
        Err(Bearer::Malformed) => Err(Rejection::Token(TokenError::Invalid)),
    };

    let caller = match admitted {
        Ok(claims) => claims.map(CallerContext::from),
        Err(rejection) => return deny(req.uri().path(), required, rejection),
    };

    if let Some(caller) = &caller {
        req.extensions_mut().insert(caller.clone());
    }

    let mut response = next.run(req).await;
    if let Some(caller) = caller {
        response.extensions_mut().insert(caller);
    }
    response
}

fn deny(path: &str, required: &Capability, rejection: Rejection) -> Response {
    let explanation = explain_authorization(rejection.claims(), required);
    tracing::debug!(
        %path,
        reason = %explanation.reason,
        "authorization denied"
    );

    let caller = rejection.claims().cloned().map(CallerContext::from);
    let mut response = ApiError::from(rejection).into_response();
    if let Some(caller) = caller {
        response.extensions_mut().insert(caller);
    }
    response
}

/// Log one line per request with the caller's role (`Guest` when anonymous).
pub async fn request_log(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let caller = response.extensions().get::<CallerContext>();
    let role = caller.map(|c| c.role().as_str()).unwrap_or("Guest");
    let username = caller.map(|c| c.username()).unwrap_or("-");
    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        role,
        username,
        "Request made by {role} to {path}"
    );

    response
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bearer {
    Absent,
    Malformed,
}

/// `Authorization: Bearer <token>`; the scheme is matched exactly.
fn extract_bearer(headers: &HeaderMap) -> Result<&str, Bearer> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(Bearer::Absent)?;

    let header = header.to_str().map_err(|_| Bearer::Malformed)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(Bearer::Malformed)?
        .trim();

    if token.is_empty() {
        return Err(Bearer::Absent);
    }

    Ok(token)
}
