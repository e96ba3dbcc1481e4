//! One-way password hashing.
//!
//! Hashing is deliberately slow. Callers on an async runtime should run
//! these methods on a blocking pool.

use argon2::password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("invalid hash parameters: {0}")]
    Params(String),

    #[error("password hashing failed: {0}")]
    Hash(String),

    /// The stored value is not a parseable PHC hash string.
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Hash/verify contract used by the credential store.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// `Ok(false)` on a mismatch; `Err` only when the stored hash is unusable.
    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// Argon2 work factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Argon2id hasher producing PHC strings with a random per-hash salt.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(cost: HashCost) -> Result<Self, PasswordError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| PasswordError::Params(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
        // Cost parameters are read from the stored hash, not from `self`.
        match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Hash(e.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) fn cheap_hasher() -> Argon2Hasher {
    Argon2Hasher::new(HashCost {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_the_plaintext_and_verifies() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("hunter2").unwrap();

        assert!(!hash.contains("hunter2"));
        assert!(hash.starts_with("$argon2id$"));
        assert_eq!(hasher.verify("hunter2", &hash), Ok(true));
        assert_eq!(hasher.verify("hunter3", &hash), Ok(false));
    }

    #[test]
    fn same_password_gets_a_fresh_salt_each_time() {
        let hasher = cheap_hasher();
        assert_ne!(hasher.hash("hunter2").unwrap(), hasher.hash("hunter2").unwrap());
    }

    #[test]
    fn verification_uses_the_cost_stored_in_the_hash() {
        let hash = cheap_hasher().hash("hunter2").unwrap();
        let other_cost = Argon2Hasher::new(HashCost {
            memory_kib: 16,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert_eq!(other_cost.verify("hunter2", &hash), Ok(true));
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        let result = cheap_hasher().verify("hunter2", "plaintext-from-a-bad-import");
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }

    #[test]
    fn zero_iterations_are_rejected() {
        let result = Argon2Hasher::new(HashCost {
            memory_kib: 8,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(PasswordError::Params(_))));
    }
}
