//! Route-level access declarations.
//!
//! Every route belongs to exactly one access group. The gate runs as a
//! `route_layer`, so unmatched paths still fall through to 404 instead of
//! being answered with 401.

use std::sync::Arc;

use axum::Router;

use rolegate_auth::{Access, Capability, TokenValidator};

use crate::middleware::{GateState, gate};

/// Put `routes` behind `access`.
pub fn gated(routes: Router, access: Access, tokens: Arc<dyn TokenValidator>) -> Router {
    if access == Access::Public {
        return routes;
    }
    routes.route_layer(axum::middleware::from_fn_with_state(
        GateState { access, tokens },
        gate,
    ))
}

/// Shorthand for routes that need one capability.
pub fn requires(routes: Router, capability: Capability, tokens: Arc<dyn TokenValidator>) -> Router {
    gated(routes, Access::capability(capability), tokens)
}
