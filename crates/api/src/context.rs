use rolegate_auth::{Claims, Role};

/// Caller context for a request (verified identity + role from the token).
///
/// Present in request extensions on every gated route. The role is the one
/// embedded in the token, which may be older than the stored role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    username: String,
    role: Role,
}

impl CallerContext {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl From<Claims> for CallerContext {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            role: claims.role,
        }
    }
}
