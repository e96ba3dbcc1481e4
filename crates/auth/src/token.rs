//! Signed session tokens (HS256 JWT).
//!
//! Tokens are stateless: nothing about an issued token is remembered, so
//! expiry is the only way a token stops working.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::claims::{Claims, TokenError, validate_claims};
use crate::Role;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Minimum accepted signing secret length, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

const MIN_DISTINCT_SECRET_BYTES: usize = 8;

/// Placeholder values that show up in tutorials and sample configs.
const KNOWN_WEAK_SECRETS: &[&str] = &[
    "your_secret_key",
    "your-secret-key",
    "secret",
    "changeme",
    "dev-secret",
    "test-secret",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecretError {
    #[error("signing secret is empty")]
    Empty,

    #[error("signing secret is {len} bytes; at least {min} are required")]
    TooShort { len: usize, min: usize },

    #[error("signing secret is a well-known placeholder value")]
    KnownPlaceholder,

    #[error("signing secret has too little variety ({distinct} distinct bytes)")]
    LowEntropy { distinct: usize },
}

/// HMAC signing secret, supplied out of band (env / secret store).
///
/// Construction validates the value; the raw bytes are only reachable
/// through [`ExposeSecret`] inside this module.
pub struct SigningSecret(SecretString);

impl SigningSecret {
    pub fn new(raw: impl Into<String>) -> Result<Self, SecretError> {
        let raw: String = raw.into();

        if raw.is_empty() {
            return Err(SecretError::Empty);
        }
        if KNOWN_WEAK_SECRETS.iter().any(|weak| raw.eq_ignore_ascii_case(weak)) {
            return Err(SecretError::KnownPlaceholder);
        }
        if raw.len() < MIN_SECRET_BYTES {
            return Err(SecretError::TooShort {
                len: raw.len(),
                min: MIN_SECRET_BYTES,
            });
        }
        let distinct = raw.bytes().collect::<HashSet<u8>>().len();
        if distinct < MIN_DISTINCT_SECRET_BYTES {
            return Err(SecretError::LowEntropy { distinct });
        }

        Ok(Self(SecretString::from(raw)))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl core::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}

/// Verifies a presented token string and yields its claims.
///
/// This is the seam the HTTP layer depends on.
pub trait TokenValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError>;
}

/// HS256 token issuer/verifier.
#[derive(Clone)]
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl Hs256TokenCodec {
    pub fn new(secret: &SigningSecret, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time checks are done by `validate_claims` against an explicit `now`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Issue a token valid from now for the configured TTL.
    pub fn issue(&self, username: &str, role: Role) -> Result<String, TokenError> {
        self.issue_at(username, role, Utc::now(), self.ttl)
    }

    pub fn issue_at(
        &self,
        username: &str,
        role: Role,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(username, role, issued_at, ttl);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify against the wall clock.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate(token, Utc::now())
    }
}

impl TokenValidator for Hs256TokenCodec {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            TokenError::Invalid
        })?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

impl core::fmt::Debug for Hs256TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256TokenCodec").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}
