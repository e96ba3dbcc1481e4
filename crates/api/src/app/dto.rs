//! Request/response DTOs and their validation.
//!
//! Request fields are all optional at the serde level so that a missing
//! field is reported as a field error instead of a deserialization failure.

use serde::{Deserialize, Serialize};

use rolegate_auth::Role;
use rolegate_core::{DomainResult, FieldErrors};

pub const MIN_PASSWORD_CHARS: usize = 5;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Option<String>,
}

/// A registration that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub username: String,
    pub password: String,
}

fn check_role(errors: &mut FieldErrors, role: Option<&str>) -> Option<Role> {
    match role.map(str::parse::<Role>) {
        Some(Ok(role)) => Some(role),
        _ => {
            errors.push("role", "Invalid role");
            None
        }
    }
}

impl RegisterRequest {
    pub fn validate(self) -> DomainResult<Registration> {
        let mut errors = FieldErrors::new();
        let username = errors.require_non_empty("username", self.username.as_deref(), "Username is required");
        let password = errors.require_min_chars(
            "password",
            self.password.as_deref(),
            MIN_PASSWORD_CHARS,
            "Password must be at least 5 characters long",
        );
        let role = check_role(&mut errors, self.role.as_deref());

        match (username, password, role) {
            (Some(username), Some(password), Some(role)) => errors.finish(Registration {
                username: username.to_string(),
                password: password.to_string(),
                role,
            }),
            _ => Err(errors.into()),
        }
    }
}

impl LoginRequest {
    pub fn validate(self) -> DomainResult<Login> {
        let mut errors = FieldErrors::new();
        let username = errors.require_non_empty("username", self.username.as_deref(), "Username is required");
        let password = errors.require_non_empty("password", self.password.as_deref(), "Password is required");

        match (username, password) {
            (Some(username), Some(password)) => errors.finish(Login {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => Err(errors.into()),
        }
    }
}

impl UpdateRoleRequest {
    pub fn validate(self) -> DomainResult<Role> {
        let mut errors = FieldErrors::new();
        match check_role(&mut errors, self.role.as_deref()) {
            Some(role) => errors.finish(role),
            None => Err(errors.into()),
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct RoleUpdatedResponse {
    pub message: &'static str,
    pub username: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolegate_core::DomainError;

    fn fields(err: DomainError) -> Vec<String> {
        match err {
            DomainError::Validation(errors) => errors.iter().map(|e| e.field.clone()).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_registration() {
        let req = RegisterRequest {
            username: Some("alice".into()),
            password: Some("hunter2".into()),
            role: Some("User".into()),
        };
        assert_eq!(
            req.validate().unwrap(),
            Registration {
                username: "alice".into(),
                password: "hunter2".into(),
                role: Role::User,
            }
        );
    }

    #[test]
    fn registration_reports_every_bad_field() {
        let req = RegisterRequest {
            username: Some(String::new()),
            password: Some("1234".into()),
            role: Some("superuser".into()),
        };
        assert_eq!(fields(req.validate().unwrap_err()), vec!["username", "password", "role"]);

        assert_eq!(
            fields(RegisterRequest::default().validate().unwrap_err()),
            vec!["username", "password", "role"]
        );
    }

    #[test]
    fn role_names_are_case_sensitive() {
        let req = RegisterRequest {
            username: Some("alice".into()),
            password: Some("hunter2".into()),
            role: Some("admin".into()),
        };
        assert_eq!(fields(req.validate().unwrap_err()), vec!["role"]);
    }

    #[test]
    fn login_requires_both_fields_but_no_length() {
        assert_eq!(
            fields(LoginRequest::default().validate().unwrap_err()),
            vec!["username", "password"]
        );
        let ok = LoginRequest {
            username: Some("a".into()),
            password: Some("b".into()),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn role_update_validation() {
        let ok = UpdateRoleRequest { role: Some("Admin".into()) };
        assert_eq!(ok.validate(), Ok(Role::Admin));
        assert_eq!(fields(UpdateRoleRequest::default().validate().unwrap_err()), vec!["role"]);
    }
}
