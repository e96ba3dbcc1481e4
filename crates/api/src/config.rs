//! Process configuration, read once at startup.
//!
//! Every setting comes from the environment; nothing secret is compiled in.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use rolegate_auth::{DEFAULT_TOKEN_TTL, HashCost, SecretError, SigningSecret};

pub const JWT_SECRET_ENV: &str = "ROLEGATE_JWT_SECRET";
pub const BIND_ADDR_ENV: &str = "ROLEGATE_BIND_ADDR";
pub const TOKEN_TTL_ENV: &str = "ROLEGATE_TOKEN_TTL_SECS";
pub const ALLOW_ADMIN_REGISTRATION_ENV: &str = "ROLEGATE_ALLOW_ADMIN_REGISTRATION";
pub const ARGON2_MEMORY_ENV: &str = "ROLEGATE_ARGON2_MEMORY_KIB";
pub const ARGON2_ITERATIONS_ENV: &str = "ROLEGATE_ARGON2_ITERATIONS";
pub const ARGON2_PARALLELISM_ENV: &str = "ROLEGATE_ARGON2_PARALLELISM";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("ROLEGATE_JWT_SECRET rejected: {0}")]
    Secret(#[from] SecretError),
}

#[derive(Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub signing_secret: SigningSecret,
    pub token_ttl: Duration,
    pub hash_cost: HashCost,
    /// Whether `POST /register` may create `Admin` identities.
    pub allow_admin_registration: bool,
}

impl AppConfig {
    /// Defaults for everything except the secret.
    pub fn new(signing_secret: SigningSecret) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            signing_secret,
            token_ttl: DEFAULT_TOKEN_TTL,
            hash_cost: HashCost::default(),
            allow_admin_registration: true,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;
        let mut config = Self::new(SigningSecret::new(secret)?);

        if let Some(addr) = parse_opt::<SocketAddr, _>(&lookup, BIND_ADDR_ENV)? {
            config.bind_addr = addr;
        }

        if let Some(secs) = parse_opt::<u64, _>(&lookup, TOKEN_TTL_ENV)? {
            if secs == 0 {
                return Err(invalid(TOKEN_TTL_ENV, "0", "must be greater than zero"));
            }
            config.token_ttl = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup(ALLOW_ADMIN_REGISTRATION_ENV) {
            config.allow_admin_registration = parse_bool(&raw)
                .ok_or_else(|| invalid(ALLOW_ADMIN_REGISTRATION_ENV, &raw, "expected true or false"))?;
        }

        let defaults = HashCost::default();
        config.hash_cost = HashCost {
            memory_kib: parse_opt(&lookup, ARGON2_MEMORY_ENV)?.unwrap_or(defaults.memory_kib),
            iterations: parse_opt(&lookup, ARGON2_ITERATIONS_ENV)?.unwrap_or(defaults.iterations),
            parallelism: parse_opt(&lookup, ARGON2_PARALLELISM_ENV)?.unwrap_or(defaults.parallelism),
        };

        Ok(config)
    }
}

fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Parse `key` if present.
fn parse_opt<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| invalid(key, &raw, e.to_string())),
        None => Ok(None),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "k3Jx9-vQ2m!Lr7pZ0aTy5uWn8sBc4dEf";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_secret_is_set() {
        let config = AppConfig::from_lookup(lookup(&[(JWT_SECRET_ENV, SECRET)])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.token_ttl, Duration::from_secs(3600));
        assert_eq!(config.hash_cost, HashCost::default());
        assert!(config.allow_admin_registration);
    }

    #[test]
    fn missing_secret_is_fatal() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(JWT_SECRET_ENV)));
    }

    #[test]
    fn demonstration_secret_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[(JWT_SECRET_ENV, "your_secret_key")])).unwrap_err();
        assert!(matches!(err, ConfigError::Secret(SecretError::KnownPlaceholder)));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            (JWT_SECRET_ENV, SECRET),
            (BIND_ADDR_ENV, "127.0.0.1:8080"),
            (TOKEN_TTL_ENV, "90"),
            (ALLOW_ADMIN_REGISTRATION_ENV, "false"),
            (ARGON2_MEMORY_ENV, "4096"),
            (ARGON2_ITERATIONS_ENV, "3"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.token_ttl, Duration::from_secs(90));
        assert!(!config.allow_admin_registration);
        assert_eq!(config.hash_cost.memory_kib, 4096);
        assert_eq!(config.hash_cost.iterations, 3);
        assert_eq!(config.hash_cost.parallelism, HashCost::default().parallelism);
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = AppConfig::from_lookup(lookup(&[(JWT_SECRET_ENV, SECRET), (TOKEN_TTL_ENV, "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains(TOKEN_TTL_ENV));

        let err = AppConfig::from_lookup(lookup(&[(JWT_SECRET_ENV, SECRET), (TOKEN_TTL_ENV, "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: TOKEN_TTL_ENV, .. }));

        let err = AppConfig::from_lookup(lookup(&[
            (JWT_SECRET_ENV, SECRET),
            (ALLOW_ADMIN_REGISTRATION_ENV, "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ALLOW_ADMIN_REGISTRATION_ENV, .. }));
    }
}
