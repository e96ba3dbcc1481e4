use serde::Serialize;
use thiserror::Error;

use crate::{Capability, Claims, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// No verified identity was presented.
    #[error("unauthenticated")]
    Unauthenticated,

    /// An identity was presented, but its role lacks the capability.
    #[error("forbidden: missing capability '{0}'")]
    Forbidden(String),
}

/// Decide whether `claims` may access `required`.
///
/// - No IO
/// - No panics
/// - The decision uses the role embedded in the claims, never a live lookup
///
/// The `public` capability needs no identity at all. Everything else first
/// requires an identity (`Unauthenticated`) and only then checks the role
/// table (`Forbidden`).
pub fn authorize(claims: Option<&Claims>, required: &Capability) -> Result<(), AuthzError> {
    if required.is_public() {
        return Ok(());
    }

    let claims = claims.ok_or(AuthzError::Unauthenticated)?;

    if claims.role.grants(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub required_capability: String,
    pub granted: bool,
    pub reason: String,
    /// `None` when no identity was presented.
    pub username: Option<String>,
    pub role: Option<Role>,
    pub effective_capabilities: Vec<String>,
    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    MissingCapability,
}

/// Explain why [`authorize`] allows or denies a request.
///
/// Always agrees with [`authorize`]; adds the effective capabilities and,
/// on denial, which roles would have been granted access.
pub fn explain_authorization(claims: Option<&Claims>, required: &Capability) -> AuthorizationExplanation {
    let required_str = required.as_str().to_string();
    let username = claims.map(|c| c.username().to_string());
    let role = claims.map(|c| c.role);
    let effective_capabilities: Vec<String> = role
        .map(|r| r.capabilities().iter().map(|c| c.as_str().to_string()).collect())
        .unwrap_or_default();

    let granting_roles: Vec<&str> = Role::ALL
        .into_iter()
        .filter(|r| r.grants(required))
        .map(|r| r.as_str())
        .collect();

    match authorize(claims, required) {
        Ok(()) => {
            let reason = match role {
                _ if required.is_public() => "Capability 'public' requires no identity".to_string(),
                Some(r) => format!("Role '{r}' grants capability '{required_str}'"),
                None => format!("Capability '{required_str}' granted"),
            };
            AuthorizationExplanation {
                required_capability: required_str,
                granted: true,
                reason,
                username,
                role,
                effective_capabilities,
                denial_reason: None,
            }
        }
        Err(AuthzError::Unauthenticated) => AuthorizationExplanation {
            reason: format!("No identity presented for capability '{required_str}'"),
            denial_reason: Some(DenialReason {
                kind: DenialKind::Unauthenticated,
                message: "A valid bearer token is required".to_string(),
                suggestions: vec!["Log in and send the token as 'Authorization: Bearer <token>'".to_string()],
            }),
            required_capability: required_str,
            granted: false,
            username,
            role,
            effective_capabilities,
        },
        Err(AuthzError::Forbidden(_)) => {
            let mut suggestions = vec![format!(
                "Roles granting '{required_str}': {}",
                if granting_roles.is_empty() {
                    "none".to_string()
                } else {
                    granting_roles.join(", ")
                }
            )];
            suggestions.push(
                "Tokens carry the role at login time; log in again after a role change".to_string(),
            );

            AuthorizationExplanation {
                reason: format!(
                    "Role '{}' does not grant capability '{required_str}'. Current capabilities: {:?}",
                    role.map(|r| r.as_str()).unwrap_or("none"),
                    effective_capabilities
                ),
                denial_reason: Some(DenialReason {
                    kind: DenialKind::MissingCapability,
                    message: format!("Missing required capability: '{required_str}'"),
                    suggestions,
                }),
                required_capability: required_str,
                granted: false,
                username,
                role,
                effective_capabilities,
            }
        }
    }
}
