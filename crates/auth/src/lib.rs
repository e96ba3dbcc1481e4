//! `rolegate-auth`: authentication/authorization core.
//!
//! This crate is intentionally decoupled from HTTP. It owns the role table,
//! token codec, credential store and the allow/deny decision.

pub mod authorize;
pub mod capability;
pub mod claims;
pub mod credentials;
pub mod password;
pub mod pipeline;
pub mod roles;
pub mod token;

pub use authorize::{
    AuthorizationExplanation, AuthzError, DenialKind, DenialReason, authorize,
    explain_authorization,
};
pub use capability::Capability;
pub use claims::{Claims, TokenError, validate_claims};
pub use credentials::{CredentialStore, Identity, InMemoryCredentialStore};
pub use password::{Argon2Hasher, HashCost, PasswordError, PasswordHasher};
pub use pipeline::{Access, Rejection, admit};
pub use roles::{Role, RoleDefinition, capabilities_of, role_table};
pub use token::{
    DEFAULT_TOKEN_TTL, Hs256TokenCodec, MIN_SECRET_BYTES, SecretError, SigningSecret,
    TokenValidator,
};
