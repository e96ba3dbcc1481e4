//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: credential store, password hasher and token codec wiring
//! - `routes/`: HTTP routes + handlers, grouped by required capability
//! - `dto.rs`: request/response DTOs and their validation
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use anyhow::Context;
use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::AppServices::from_config(config).context("building password hasher")?;

    Ok(routes::router(&services).layer(
        ServiceBuilder::new()
            .layer(CatchPanicLayer::custom(|_panic: Box<dyn std::any::Any + Send + 'static>| {
                errors::unexpected_response()
            }))
            .layer(TraceLayer::new_for_http())
            .layer(axum::middleware::from_fn(middleware::request_log))
            .layer(Extension(Arc::new(services))),
    ))
}
