// Sign-in service configuration.
//
// Centralizes environment variable parsing with defaults for local
// development.

use std::time::Duration;

use crate::{invitation::DEFAULT_INVITE_EXPIRY_HOURS, token::DEFAULT_LOGIN_TOKEN_TTL_SECONDS};

const DEV_TOKEN_SECRET: &str = "gatehouse_local_development_token_secret_32_chars";

/// Connection pool sizing for the sign-in database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self { min_connections: 2, max_connections: 20, acquire_timeout: Duration::from_secs(10) }
    }
}

/// Core auth configuration.
///
/// Constructed via [`AuthConfig::from_env`] which reads environment
/// variables and falls back to development defaults.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Log filter directive (e.g. `info`, `gatehouse_auth=debug`).
    pub log_filter: String,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
    /// HS256 secret for login tokens.
    pub token_secret: String,
    pub login_token_ttl_seconds: i64,
    pub invite_expiry_hours: u32,
    /// Server-wide switch for email/password sign-in.
    pub password_auth_enabled: bool,
    pub pool: PoolSettings,
}

impl AuthConfig {
    /// Parse configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `GATEHOUSE_AUTH_DATABASE_URL` | *(none)* |
    /// | `GATEHOUSE_AUTH_LOG_FILTER` | `info` |
    /// | `GATEHOUSE_AUTH_LOG_JSON` | `false` |
    /// | `GATEHOUSE_AUTH_TOKEN_SECRET` | dev-only placeholder |
    /// | `GATEHOUSE_AUTH_LOGIN_TOKEN_TTL_SECS` | `900` |
    /// | `GATEHOUSE_AUTH_INVITE_EXPIRY_HOURS` | `72` |
    /// | `GATEHOUSE_AUTH_PASSWORD_AUTH_ENABLED` | `true` |
    /// | `GATEHOUSE_AUTH_DB_MIN_CONNECTIONS` | `2` |
    /// | `GATEHOUSE_AUTH_DB_MAX_CONNECTIONS` | `20` |
    /// | `GATEHOUSE_AUTH_DB_ACQUIRE_TIMEOUT_SECS` | `10` |
    pub fn from_env() -> Self {
        Self::from_env_fn(|key| std::env::var(key))
    }

    /// Testable constructor that accepts an environment lookup function.
    pub(crate) fn from_env_fn<F>(env: F) -> Self
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let database_url =
            env("GATEHOUSE_AUTH_DATABASE_URL").ok().filter(|value| !value.trim().is_empty());

        let log_filter = env("GATEHOUSE_AUTH_LOG_FILTER").unwrap_or_else(|_| "info".into());
        let log_json = parse_bool(env("GATEHOUSE_AUTH_LOG_JSON").ok()).unwrap_or(false);

        let token_secret = env("GATEHOUSE_AUTH_TOKEN_SECRET")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEV_TOKEN_SECRET.into());

        let login_token_ttl_seconds = env("GATEHOUSE_AUTH_LOGIN_TOKEN_TTL_SECS")
            .ok()
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_LOGIN_TOKEN_TTL_SECONDS);

        let invite_expiry_hours = env("GATEHOUSE_AUTH_INVITE_EXPIRY_HOURS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_INVITE_EXPIRY_HOURS);

        let password_auth_enabled =
            parse_bool(env("GATEHOUSE_AUTH_PASSWORD_AUTH_ENABLED").ok()).unwrap_or(true);

        let defaults = PoolSettings::default();
        let max_connections = env("GATEHOUSE_AUTH_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(defaults.max_connections);
        // Never keep more idle connections than the pool may open.
        let min_connections = env("GATEHOUSE_AUTH_DB_MIN_CONNECTIONS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(defaults.min_connections)
            .min(max_connections);
        let acquire_timeout = env("GATEHOUSE_AUTH_DB_ACQUIRE_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|value| *value > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.acquire_timeout);
        let pool = PoolSettings { min_connections, max_connections, acquire_timeout };

        Self {
            database_url,
            log_filter,
            log_json,
            token_secret,
            login_token_ttl_seconds,
            invite_expiry_hours,
            password_auth_enabled,
            pool,
        }
    }

    /// Returns true when using the development-only token secret.
    pub fn is_dev_token_secret(&self) -> bool {
        self.token_secret == DEV_TOKEN_SECRET
    }
}

fn parse_bool(value: Option<String>) -> Option<bool> {
    match value?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
