//! Service wiring shared by all handlers.

use std::sync::Arc;

use rolegate_auth::{
    Argon2Hasher, CredentialStore, Hs256TokenCodec, Identity, InMemoryCredentialStore, PasswordError, Role,
    TokenValidator,
};

use crate::app::dto::{Login, Registration};
use crate::app::errors::ApiError;
use crate::config::AppConfig;

pub struct AppServices {
    credentials: Arc<dyn CredentialStore>,
    tokens: Arc<Hs256TokenCodec>,
    allow_admin_registration: bool,
}

impl AppServices {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        tokens: Arc<Hs256TokenCodec>,
        allow_admin_registration: bool,
    ) -> Self {
        Self {
            credentials,
            tokens,
            allow_admin_registration,
        }
    }

    /// In-memory store + Argon2 + HS256, as configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, PasswordError> {
        let hasher = Arc::new(Argon2Hasher::new(config.hash_cost)?);
        let credentials = Arc::new(InMemoryCredentialStore::new(hasher)?);
        let tokens = Arc::new(Hs256TokenCodec::new(&config.signing_secret, config.token_ttl));
        Ok(Self::new(credentials, tokens, config.allow_admin_registration))
    }

    pub fn token_validator(&self) -> Arc<dyn TokenValidator> {
        self.tokens.clone()
    }

    pub async fn register(&self, registration: Registration) -> Result<(), ApiError> {
        if registration.role == Role::Admin && !self.allow_admin_registration {
            return Err(ApiError::Forbidden("admin self-registration is disabled".to_string()));
        }

        let credentials = Arc::clone(&self.credentials);
        blocking(move || {
            credentials.register(&registration.username, &registration.password, registration.role)
        })
        .await
    }

    /// Verify credentials and issue a token carrying the current role.
    pub async fn login(&self, login: Login) -> Result<String, ApiError> {
        let credentials = Arc::clone(&self.credentials);
        let identity: Identity =
            blocking(move || credentials.verify(&login.username, &login.password)).await?;

        let token = self.tokens.issue(&identity.username, identity.role)?;
        tracing::info!(username = %identity.username, role = %identity.role, "token issued");
        Ok(token)
    }

    pub fn reassign_role(&self, username: &str, role: Role) -> Result<(), ApiError> {
        Ok(self.credentials.reassign_role(username, role)?)
    }
}

/// Run password hashing off the async workers.
///
/// If the caller goes away the closure still runs to completion. Store
/// operations are atomic, so nothing is left half-written.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> rolegate_core::DomainResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::unexpected(format!("blocking task failed: {e}")))?
        .map_err(ApiError::from)
}
