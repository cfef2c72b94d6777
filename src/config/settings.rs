//! Server settings loaded from environment variables (and `.env` via dotenvy).

use crate::config::policy::{PolicyPreset, ValidationPolicy};
use crate::error::ConfigError;
use std::str::FromStr;

/// Which storage backend holds the book collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            _ => Err(ConfigError::Invalid {
                key: "BOOKS_STORE",
                value: s.to_string(),
                reason: "expected postgres or memory",
            }),
        }
    }
}

/// Authorization gate in front of mutating routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthGate {
    /// No role check.
    Open,
    /// Mutations require the admin role.
    Admin,
}

impl FromStr for AuthGate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" | "none" | "off" => Ok(AuthGate::Open),
            "admin" => Ok(AuthGate::Admin),
            _ => Err(ConfigError::Invalid {
                key: "BOOKS_AUTH_GATE",
                value: s.to_string(),
                reason: "expected open or admin",
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// `APP_ENV=development` turns on per-request trace logging.
    pub development: bool,
    pub store: StoreKind,
    /// Schema holding the `books` table. Must be a valid PostgreSQL identifier.
    pub schema: String,
    pub auth_gate: AuthGate,
    pub policy: ValidationPolicy,
    pub max_connections: u32,
    pub body_limit_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: "postgres://localhost/bookshelf".into(),
            host: "0.0.0.0".into(),
            port: 5001,
            development: false,
            store: StoreKind::Postgres,
            schema: "public".into(),
            auth_gate: AuthGate::Admin,
            policy: ValidationPolicy::default(),
            max_connections: 5,
            body_limit_bytes: 64 * 1024,
        }
    }
}

impl Settings {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut s = Settings::default();

        if let Some(url) = get("DATABASE_URL") {
            s.database_url = url;
        }
        if let Some(host) = get("HOST") {
            s.host = host;
        }
        if let Some(port) = get("PORT") {
            s.port = parse_number("PORT", &port)?;
        }
        if let Some(env) = get("APP_ENV") {
            s.development = env.eq_ignore_ascii_case("development");
        }
        if let Some(store) = get("BOOKS_STORE") {
            s.store = store.parse()?;
        }
        if let Some(schema) = get("BOOKS_SCHEMA") {
            if !is_identifier(&schema) {
                return Err(ConfigError::Invalid {
                    key: "BOOKS_SCHEMA",
                    value: schema,
                    reason: "not a valid identifier",
                });
            }
            s.schema = schema;
        }
        if let Some(gate) = get("BOOKS_AUTH_GATE") {
            s.auth_gate = gate.parse()?;
        }
        if let Some(preset) = get("BOOKS_VALIDATION") {
            s.policy = ValidationPolicy::from_preset(preset.parse::<PolicyPreset>()?);
        }
        if let Some(unique) = get("BOOKS_UNIQUE_TITLES") {
            s.policy = s.policy.with_unique_titles(parse_bool("BOOKS_UNIQUE_TITLES", &unique)?);
        }
        if let Some(n) = get("DB_MAX_CONNECTIONS") {
            s.max_connections = parse_number("DB_MAX_CONNECTIONS", &n)?;
        }
        if let Some(n) = get("BODY_LIMIT_BYTES") {
            s.body_limit_bytes = parse_number("BODY_LIMIT_BYTES", &n)?;
        }
        Ok(s)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: "expected a number",
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "expected true or false",
        }),
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::policy::FieldRule;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let s = load(&[]).unwrap();
        assert_eq!(s.port, 5001);
        assert_eq!(s.store, StoreKind::Postgres);
        assert_eq!(s.auth_gate, AuthGate::Admin);
        assert_eq!(s.policy, ValidationPolicy::lenient());
        assert!(!s.development);
    }

    #[test]
    fn strict_preset_with_unique_override() {
        let s = load(&[("BOOKS_VALIDATION", "strict"), ("BOOKS_UNIQUE_TITLES", "true")]).unwrap();
        assert_eq!(s.policy.author, FieldRule::Required);
        assert!(s.policy.unique_titles);
    }

    #[test]
    fn reads_port_env_mode_and_backend() {
        let s = load(&[
            ("PORT", "8080"),
            ("APP_ENV", "development"),
            ("BOOKS_STORE", "memory"),
            ("BOOKS_AUTH_GATE", "open"),
        ])
        .unwrap();
        assert_eq!(s.bind_addr(), "0.0.0.0:8080");
        assert!(s.development);
        assert_eq!(s.store, StoreKind::Memory);
        assert_eq!(s.auth_gate, AuthGate::Open);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(load(&[("PORT", "eighty")]).is_err());
        assert!(load(&[("BOOKS_STORE", "mongo")]).is_err());
        assert!(load(&[("BOOKS_SCHEMA", "bad-schema;")]).is_err());
        assert!(load(&[("BOOKS_UNIQUE_TITLES", "maybe")]).is_err());
    }
}
