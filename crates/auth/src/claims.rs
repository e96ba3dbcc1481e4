use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

/// Token claims.
///
/// A detached snapshot of (username, role) at issuance time. Changing the
/// identity's role later does not touch tokens that are already out there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the username.
    pub sub: String,

    /// Role at issuance time.
    pub role: Role,

    /// Issued-at, unix seconds.
    pub iat: i64,

    /// Expiry, unix seconds.
    pub exp: i64,
}

impl Claims {
    pub fn new(username: impl Into<String>, role: Role, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        let iat = issued_at.timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            sub: username.into(),
            role,
            iat,
            exp: iat.saturating_add(ttl_secs),
        }
    }

    pub fn username(&self) -> &str {
        &self.sub
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, malformed structure or an impossible time window.
    #[error("invalid token")]
    Invalid,

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Deterministically validate the time window of already-decoded claims.
///
/// Signature checking happens in the codec; this only looks at `iat`/`exp`.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.exp <= claims.iat {
        return Err(TokenError::Invalid);
    }
    let now = now.timestamp();
    if now < claims.iat {
        return Err(TokenError::Invalid);
    }
    if now > claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    #[test]
    fn expiry_is_issued_at_plus_ttl() {
        let claims = Claims::new("alice", Role::User, at(1_000), Duration::from_secs(3600));
        assert_eq!(claims.iat, 1_000);
        assert_eq!(claims.exp, 4_600);
        assert_eq!(claims.username(), "alice");
    }

    #[test]
    fn valid_up_to_and_including_expiry() {
        let claims = Claims::new("alice", Role::User, at(1_000), Duration::from_secs(60));
        assert_eq!(validate_claims(&claims, at(1_000)), Ok(()));
        assert_eq!(validate_claims(&claims, at(1_060)), Ok(()));
        assert_eq!(validate_claims(&claims, at(1_061)), Err(TokenError::Expired));
    }

    #[test]
    fn future_issue_time_is_invalid() {
        let claims = Claims::new("alice", Role::User, at(1_000), Duration::from_secs(60));
        assert_eq!(validate_claims(&claims, at(999)), Err(TokenError::Invalid));
    }

    #[test]
    fn empty_window_is_invalid() {
        let claims = Claims::new("alice", Role::Admin, at(1_000), Duration::ZERO);
        assert_eq!(validate_claims(&claims, at(1_000)), Err(TokenError::Invalid));
    }
}
