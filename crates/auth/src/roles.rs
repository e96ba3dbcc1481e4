//! Static role table.
//!
//! The role set is closed: there is no API for adding roles or changing
//! what a role grants at runtime.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use rolegate_core::DomainError;

use crate::Capability;

/// Role tier. Serialized exactly as `"Admin"`, `"User"`, `"Guest"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Admin,
    User,
    Guest,
}

static ADMIN_CAPABILITIES: [Capability; 3] = [Capability::PUBLIC, Capability::USER, Capability::ADMIN];
static USER_CAPABILITIES: [Capability; 2] = [Capability::PUBLIC, Capability::USER];
static GUEST_CAPABILITIES: [Capability; 1] = [Capability::PUBLIC];

impl Role {
    /// Every role, highest tier first.
    pub const ALL: [Role; 3] = [Role::Admin, Role::User, Role::Guest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
            Role::Guest => "Guest",
        }
    }

    /// Capability labels owned by this role (no duplicates).
    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Role::Admin => &ADMIN_CAPABILITIES,
            Role::User => &USER_CAPABILITIES,
            Role::Guest => &GUEST_CAPABILITIES,
        }
    }

    pub fn grants(self, capability: &Capability) -> bool {
        self.capabilities().contains(capability)
    }

    fn description(self) -> &'static str {
        match self {
            Role::Admin => "Full access including role administration",
            Role::User => "Registered user with access to user content",
            Role::Guest => "Public content only",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    /// Case-sensitive: `"admin"` is not a role.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| DomainError::invalid_role(s))
    }
}

/// Set of capability labels a role may access.
pub fn capabilities_of(role: Role) -> HashSet<Capability> {
    role.capabilities().iter().cloned().collect()
}

/// Role definition with its capabilities (for display).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDefinition {
    pub name: Role,
    pub capabilities: Vec<Capability>,
    pub description: &'static str,
}

/// The whole role table, highest tier first.
pub fn role_table() -> Vec<RoleDefinition> {
    Role::ALL
        .into_iter()
        .map(|role| RoleDefinition {
            name: role,
            capabilities: role.capabilities().to_vec(),
            description: role.description(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn table_matches_the_three_tiers() {
        let admin = capabilities_of(Role::Admin);
        let user = capabilities_of(Role::User);
        let guest = capabilities_of(Role::Guest);

        assert_eq!(
            admin,
            HashSet::from([Capability::PUBLIC, Capability::USER, Capability::ADMIN])
        );
        assert_eq!(user, HashSet::from([Capability::PUBLIC, Capability::USER]));
        assert_eq!(guest, HashSet::from([Capability::PUBLIC]));

        assert!(admin.is_superset(&user));
        assert!(user.is_superset(&guest));
    }

    #[test]
    fn every_role_has_a_non_empty_set() {
        for role in Role::ALL {
            assert!(!capabilities_of(role).is_empty(), "{role} has no capabilities");
        }
    }

    #[test]
    fn parsing_is_exact_and_case_sensitive() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("User".parse::<Role>(), Ok(Role::User));
        assert_eq!("Guest".parse::<Role>(), Ok(Role::Guest));

        for bad in ["admin", "ADMIN", " User", "Superuser", ""] {
            assert_eq!(bad.parse::<Role>(), Err(DomainError::invalid_role(bad)));
        }
    }

    #[test]
    fn serde_uses_the_display_names() {
        let json = serde_json::to_string(&Role::Guest).unwrap();
        assert_eq!(json, "\"Guest\"");
        let role: Role = serde_json::from_str("\"Admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }

    #[test]
    fn role_table_lists_all_roles_in_tier_order() {
        let table = role_table();
        let names: Vec<_> = table.iter().map(|d| d.name).collect();
        assert_eq!(names, Role::ALL.to_vec());
        assert_eq!(table[2].capabilities, vec![Capability::PUBLIC]);
    }

    proptest! {
        /// Property: whatever a lower tier is granted, every higher tier is
        /// granted too.
        #[test]
        fn grants_are_monotonic_up_the_hierarchy(
            label in prop_oneof![
                Just("public".to_string()),
                Just("user".to_string()),
                Just("admin".to_string()),
                "[a-z]{0,8}",
            ]
        ) {
            let cap = Capability::new(label);
            if Role::Guest.grants(&cap) {
                prop_assert!(Role::User.grants(&cap));
            }
            if Role::User.grants(&cap) {
                prop_assert!(Role::Admin.grants(&cap));
            }
        }
    }
}
