//! TOML-based configuration for the expense manager server
//!
//! Infrastructure settings live in `expense.toml`; secrets never do. The file
//! names the environment variable holding the JWT secret, and the secret is
//! resolved from the environment at startup.
//!
//! A few settings can also be overridden from the environment: `PORT`,
//! `DATABASE_URL` and `JWT_EXPIRY`.

use chrono::{TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure loaded from expense.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Allowed CORS origin; any origin when unset
    #[serde(default)]
    pub client_origin: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            client_origin: None,
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    /// Token lifetime, e.g. `"1d"`, `"12h"`, `"3600"`
    #[serde(default = "default_token_ttl")]
    pub token_ttl: String,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET".to_string()
}

fn default_token_ttl() -> String {
    "1d".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            token_ttl: default_token_ttl(),
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path, or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Upper bound on a single user lookup
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,
}

fn default_database_url() -> String {
    "./data/expense-manager.db".to_string()
}

fn default_lookup_timeout_secs() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            lookup_timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Invalid token TTL '{0}': expected a number optionally followed by s, m, h, d or w")]
    InvalidTtl(String),
}

/// Parses a token lifetime such as `"1d"`, `"90m"` or `"3600"` (seconds).
pub fn parse_ttl(raw: &str) -> Result<i64, ConfigError> {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    let amount: i64 = digits
        .parse()
        .map_err(|_| ConfigError::InvalidTtl(raw.to_string()))?;

    let multiplier = match unit.trim() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        "w" => 7 * 24 * 60 * 60,
        _ => return Err(ConfigError::InvalidTtl(raw.to_string())),
    };

    amount
        .checked_mul(multiplier)
        .ok_or_else(|| ConfigError::InvalidTtl(raw.to_string()))
}

impl AppConfig {
    /// Load configuration from a TOML file. The file must exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;

        Ok(config)
    }

    /// Load `path` if present, otherwise start from defaults; then apply
    /// environment overrides and validate.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate_with(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Apply `PORT`, `DATABASE_URL` and `JWT_EXPIRY` overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
            self.database.url = url;
        }
        if let Some(ttl) = lookup("JWT_EXPIRY").filter(|t| !t.is_empty()) {
            self.auth.token_ttl = ttl;
        }
    }

    /// Validate the configuration, resolving the secret through `lookup`.
    pub fn validate_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        self.jwt_secret_with(lookup)?;

        if self.token_ttl_secs()? <= 0 {
            return Err(ConfigError::ValidationError(
                "auth.token_ttl must be positive".to_string(),
            ));
        }

        if self.database.lookup_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "database.lookup_timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the JWT secret from the environment
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        self.jwt_secret_with(|key| std::env::var(key).ok())
    }

    fn jwt_secret_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<String, ConfigError> {
        lookup(&self.auth.jwt_secret_env)
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))
    }

    /// Token lifetime in seconds; must be representable as an expiry date.
    pub fn token_ttl_secs(&self) -> Result<i64, ConfigError> {
        let secs = parse_ttl(&self.auth.token_ttl)?;

        TimeDelta::try_seconds(secs)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .map(|_| secs)
            .ok_or_else(|| ConfigError::InvalidTtl(self.auth.token_ttl.clone()))
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.database.lookup_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn create_test_config() -> String {
        r#"
[server]
host = "0.0.0.0"
port = 9000
log_level = "debug"
client_origin = "http://localhost:3000"

[auth]
jwt_secret_env = "TEST_JWT_SECRET"
token_ttl = "12h"

[database]
url = ":memory:"
lookup_timeout_secs = 2
"#
        .to_string()
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_config() {
        let config: AppConfig = toml::from_str(&create_test_config()).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.server.client_origin.as_deref(),
            Some("http://localhost:3000")
        );
        assert_eq!(config.auth.jwt_secret_env, "TEST_JWT_SECRET");
        assert_eq!(config.token_ttl_secs().unwrap(), 12 * 3600);
        assert_eq!(config.lookup_timeout(), Duration::from_secs(2));
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.jwt_secret_env, "JWT_SECRET");
        assert_eq!(config.token_ttl_secs().unwrap(), 86400);
        assert_eq!(config.database.lookup_timeout_secs, 5);
    }

    #[rstest]
    #[case("1d", 86400)]
    #[case("12h", 43200)]
    #[case("90m", 5400)]
    #[case("45s", 45)]
    #[case("3600", 3600)]
    #[case("2w", 1209600)]
    #[case(" 7d ", 604800)]
    fn test_parse_ttl(#[case] raw: &str, #[case] expected: i64) {
        assert_eq!(parse_ttl(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("d")]
    #[case("1y")]
    #[case("-5m")]
    #[case("ten minutes")]
    fn test_parse_ttl_rejects(#[case] raw: &str) {
        assert!(matches!(parse_ttl(raw), Err(ConfigError::InvalidTtl(_))));
    }

    #[test]
    fn test_missing_secret_fails_validation() {
        let config = AppConfig::default();

        assert!(matches!(
            config.validate_with(env(&[])),
            Err(ConfigError::MissingEnvVar(name)) if name == "JWT_SECRET"
        ));
        assert!(matches!(
            config.validate_with(env(&[("JWT_SECRET", "")])),
            Err(ConfigError::MissingEnvVar(_))
        ));
        assert!(config
            .validate_with(env(&[("JWT_SECRET", "a-real-secret")]))
            .is_ok());
    }

    #[test]
    fn test_zero_ttl_fails_validation() {
        let mut config = AppConfig::default();
        config.auth.token_ttl = "0s".to_string();

        assert!(matches!(
            config.validate_with(env(&[("JWT_SECRET", "secret")])),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[rstest]
    #[case("100000000d")]
    #[case("9223372036854775807")]
    fn test_overflowing_ttl_fails_validation(#[case] ttl: &str) {
        let mut config = AppConfig::default();
        config.auth.token_ttl = ttl.to_string();

        assert!(matches!(
            config.validate_with(env(&[("JWT_SECRET", "secret")])),
            Err(ConfigError::InvalidTtl(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(env(&[
            ("PORT", "4000"),
            ("DATABASE_URL", ":memory:"),
            ("JWT_EXPIRY", "2h"),
        ]));

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.database.url, ":memory:");
        assert_eq!(config.token_ttl_secs().unwrap(), 7200);
    }

    #[test]
    fn test_load_missing_file() {
        let result = AppConfig::load("definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
