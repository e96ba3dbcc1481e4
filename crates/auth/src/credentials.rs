//! Credential store: registered identities and their password hashes.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, RwLock};

use rolegate_core::{DomainError, DomainResult};

use crate::{PasswordError, PasswordHasher, Role};

/// A registered principal.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl core::fmt::Debug for Identity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Storage contract for identities.
///
/// Usernames are compared exactly (case-sensitive). Implementations must make
/// each operation atomic with respect to the uniqueness check and role
/// updates.
pub trait CredentialStore: Send + Sync {
    /// Fails with `DuplicateUsername` if the name is taken.
    fn register(&self, username: &str, password: &str, role: Role) -> DomainResult<()>;

    /// Fails with `InvalidCredentials` both for unknown users and wrong
    /// passwords.
    fn verify(&self, username: &str, password: &str) -> DomainResult<Identity>;

    fn reassign_role(&self, username: &str, role: Role) -> DomainResult<()>;
}

/// In-memory credential store. Contents live as long as the process.
pub struct InMemoryCredentialStore {
    identities: RwLock<HashMap<String, Identity>>,
    hasher: Arc<dyn PasswordHasher>,
    decoy_hash: String,
}

impl InMemoryCredentialStore {
    /// Hashes the decoy password up front, so this costs one hash.
    pub fn new(hasher: Arc<dyn PasswordHasher>) -> Result<Self, PasswordError> {
        let decoy_hash = hasher.hash("rolegate-decoy-password")?;
        Ok(Self {
            identities: RwLock::new(HashMap::new()),
            hasher,
            decoy_hash,
        })
    }

    fn len(&self) -> usize {
        self.identities.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Burn one verification so an unknown username costs the same as a
    /// wrong password.
    fn verify_decoy(&self, password: &str) {
        let _ = self.hasher.verify(password, &self.decoy_hash);
    }
}

impl core::fmt::Debug for InMemoryCredentialStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryCredentialStore")
            .field("identities", &self.len())
            .finish_non_exhaustive()
    }
}

fn poisoned<T>(_: T) -> DomainError {
    DomainError::unexpected("credential store lock poisoned")
}

fn hash_fault(e: PasswordError) -> DomainError {
    DomainError::unexpected(e.to_string())
}

impl CredentialStore for InMemoryCredentialStore {
    fn register(&self, username: &str, password: &str, role: Role) -> DomainResult<()> {
        // Cheap early exit so duplicates don't pay for a hash.
        if self.identities.read().map_err(poisoned)?.contains_key(username) {
            return Err(DomainError::duplicate_username(username));
        }

        let password_hash = self.hasher.hash(password).map_err(hash_fault)?;

        // The authoritative uniqueness check happens under the write lock.
        let mut identities = self.identities.write().map_err(poisoned)?;
        match identities.entry(username.to_string()) {
            Entry::Occupied(_) => Err(DomainError::duplicate_username(username)),
            Entry::Vacant(slot) => {
                slot.insert(Identity {
                    username: username.to_string(),
                    password_hash,
                    role,
                });
                tracing::info!(username, role = %role, "identity registered");
                Ok(())
            }
        }
    }

    fn verify(&self, username: &str, password: &str) -> DomainResult<Identity> {
        let identity = self.identities.read().map_err(poisoned)?.get(username).cloned();

        let Some(identity) = identity else {
            self.verify_decoy(password);
            return Err(DomainError::InvalidCredentials);
        };

        if self.hasher.verify(password, &identity.password_hash).map_err(hash_fault)? {
            Ok(identity)
        } else {
            Err(DomainError::InvalidCredentials)
        }
    }

    fn reassign_role(&self, username: &str, role: Role) -> DomainResult<()> {
        let mut identities = self.identities.write().map_err(poisoned)?;
        let identity = identities
            .get_mut(username)
            .ok_or_else(|| DomainError::user_not_found(username))?;

        let previous = identity.role;
        identity.role = role;
        tracing::info!(username, from = %previous, to = %role, "role reassigned");
        Ok(())
    }
}
