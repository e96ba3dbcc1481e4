//! Request admission: identify, then authorize.
//!
//! Transport-agnostic. The HTTP layer extracts the bearer string and maps a
//! [`Rejection`] to a status code; everything in between lives here.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{AuthzError, Capability, Claims, TokenError, TokenValidator, authorize};

/// What a route requires before its handler may run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// No identity needed; any token is ignored.
    Public,
    Requires(Capability),
}

impl Access {
    /// `Public` for the public capability, `Requires` for everything else.
    pub fn capability(capability: Capability) -> Self {
        if capability.is_public() {
            Access::Public
        } else {
            Access::Requires(capability)
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("no bearer token provided")]
    MissingToken,

    #[error(transparent)]
    Token(#[from] TokenError),

    /// The caller was identified, but authorization failed. The verified
    /// claims ride along so the denial can be attributed.
    #[error("{error}")]
    Denied { claims: Claims, error: AuthzError },
}

impl Rejection {
    /// Verified claims, if identification got that far.
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Rejection::Denied { claims, .. } => Some(claims),
            _ => None,
        }
    }
}

/// Run identification and authorization for one request.
///
/// Returns `Ok(None)` for public routes, `Ok(Some(claims))` once admitted.
/// Stages run strictly in order and stop at the first failure.
pub fn admit(
    access: &Access,
    bearer: Option<&str>,
    validator: &dyn TokenValidator,
    now: DateTime<Utc>,
) -> Result<Option<Claims>, Rejection> {
    let required = match access {
        Access::Public => return Ok(None),
        Access::Requires(capability) => capability,
    };

    let token = bearer.ok_or(Rejection::MissingToken)?;
    let claims = validator.validate(token, now)?;

    match authorize(Some(&claims), required) {
        Ok(()) => Ok(Some(claims)),
        Err(error) => Err(Rejection::Denied { claims, error }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_TOKEN_TTL, Hs256TokenCodec, Role, SigningSecret};
    use std::time::Duration;

    fn codec() -> Hs256TokenCodec {
        Hs256TokenCodec::new(
            &SigningSecret::new("k3Jx9-vQ2m!Lr7pZ0aTy5uWn8sBc4dEf").unwrap(),
            DEFAULT_TOKEN_TTL,
        )
    }

    /// Panics if consulted; proves a stage was skipped.
    struct UnreachableValidator;

    impl TokenValidator for UnreachableValidator {
        fn validate(&self, _token: &str, _now: DateTime<Utc>) -> Result<Claims, TokenError> {
            panic!("validator must not be consulted");
        }
    }

    #[test]
    fn public_routes_skip_identification() {
        let result = admit(&Access::Public, Some("garbage"), &UnreachableValidator, Utc::now());
        assert_eq!(result, Ok(None));
        assert_eq!(Access::capability(Capability::PUBLIC), Access::Public);
    }

    #[test]
    fn missing_token_is_rejected_before_validation() {
        let access = Access::capability(Capability::USER);
        let result = admit(&access, None, &UnreachableValidator, Utc::now());
        assert_eq!(result, Err(Rejection::MissingToken));
    }

    #[test]
    fn admitted_request_carries_claims() {
        let codec = codec();
        let token = codec.issue("alice", Role::User).unwrap();

        let claims = admit(&Access::capability(Capability::USER), Some(&token), &codec, Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(claims.username(), "alice");
    }

    #[test]
    fn wrong_role_is_forbidden_not_unauthenticated() {
        let codec = codec();
        let token = codec.issue("alice", Role::User).unwrap();

        let err = admit(&Access::capability(Capability::ADMIN), Some(&token), &codec, Utc::now()).unwrap_err();
        assert!(matches!(
            &err,
            Rejection::Denied { error: AuthzError::Forbidden(cap), .. } if cap == "admin"
        ));
        let claims = err.claims().unwrap();
        assert_eq!(claims.username(), "alice");
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn expired_token_is_unauthenticated() {
        let codec = codec();
        let issued = Utc::now();
        let token = codec
            .issue_at("root", Role::Admin, issued, Duration::from_secs(10))
            .unwrap();

        let err = admit(
            &Access::capability(Capability::ADMIN),
            Some(&token),
            &codec,
            issued + chrono::Duration::seconds(11),
        )
        .unwrap_err();
        assert_eq!(err, Rejection::Token(TokenError::Expired));
        assert_eq!(err.claims(), None);
    }
}
