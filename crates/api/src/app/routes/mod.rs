use axum::{
    routing::{get, post, put},
    Router,
};

use rolegate_auth::Capability;

use crate::app::services::AppServices;
use crate::authz;

pub mod accounts;
pub mod resources;
pub mod system;
pub mod users;

/// Full routing table, one access group per required capability.
pub fn router(services: &AppServices) -> Router {
    let tokens = services.token_validator();

    let public = Router::new()
        .route("/health", get(system::health))
        .route("/public", get(system::public_content))
        .route("/roles", get(system::roles))
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login));

    let user = authz::requires(
        Router::new().route("/user", get(resources::user_content)),
        Capability::USER,
        tokens.clone(),
    );

    let admin = authz::requires(
        Router::new()
            .route("/admin", get(resources::admin_content))
            .route("/user/:username/role", put(users::update_role)),
        Capability::ADMIN,
        tokens,
    );

    Router::new().merge(public).merge(user).merge(admin)
}
