/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, GATE_USERS, comparison mode, limits)
 * - 設定値のバリデーション (不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::services::gate::PasswordComparison;
use crate::services::users::{StaticUserStore, UserTableError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
    Users(UserTableError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
            ConfigError::Users(e) => write!(f, "invalid configuration: GATE_USERS ({})", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<UserTableError> for ConfigError {
    fn from(e: UserTableError) -> Self {
        ConfigError::Users(e)
    }
}

pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub users: StaticUserStore,
    pub password_comparison: PasswordComparison,

    pub body_limit_bytes: usize,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key -> value source. `from_env` passes the process environment.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let port: u16 = match get("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = get("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let users = StaticUserStore::parse(&get("GATE_USERS").unwrap_or_default())?;

        let password_comparison = match get("GATE_PASSWORD_COMPARISON") {
            Some(v) => v
                .parse()
                .map_err(|_| ConfigError::Invalid("GATE_PASSWORD_COMPARISON"))?,
            None => PasswordComparison::Plaintext,
        };

        let body_limit_bytes = match get("GATE_BODY_LIMIT_BYTES") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("GATE_BODY_LIMIT_BYTES"))?,
            None => DEFAULT_BODY_LIMIT_BYTES,
        };

        let request_timeout = get("REQUEST_TIMEOUT_SECONDS")
            .map(|v| v.trim().parse::<u64>())
            .transpose()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS));

        // Production must be able to authenticate somebody.
        if app_env.is_production() && users.is_empty() {
            return Err(ConfigError::Missing("GATE_USERS"));
        }

        Ok(Self {
            addr,
            app_env,
            users,
            password_comparison,
            body_limit_bytes,
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&'static str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(config.users.is_empty());
        assert_eq!(config.password_comparison, PasswordComparison::Plaintext);
        assert_eq!(config.body_limit_bytes, DEFAULT_BODY_LIMIT_BYTES);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "8080"),
            ("APP_ENV", "prod"),
            ("GATE_USERS", "test_user:test_password"),
            ("GATE_PASSWORD_COMPARISON", "digest"),
            ("GATE_BODY_LIMIT_BYTES", "2048"),
            ("REQUEST_TIMEOUT_SECONDS", "5"),
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert!(config.app_env.is_production());
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.password_comparison, PasswordComparison::Digest);
        assert_eq!(config.body_limit_bytes, 2048);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(matches!(
            config(&[("PORT", "http")]),
            Err(ConfigError::Invalid("PORT"))
        ));
        assert!(matches!(
            config(&[("GATE_PASSWORD_COMPARISON", "md5")]),
            Err(ConfigError::Invalid("GATE_PASSWORD_COMPARISON"))
        ));
        assert!(matches!(
            config(&[("GATE_USERS", "nobody")]),
            Err(ConfigError::Users(_))
        ));
    }

    #[test]
    fn test_production_requires_users() {
        assert!(matches!(
            config(&[("APP_ENV", "production")]),
            Err(ConfigError::Missing("GATE_USERS"))
        ));
    }
}
