//! Server Configuration
//!
//! Read once from the environment at startup. Anything missing or malformed
//! is a [`ConfigError`] and the server does not start.

use std::time::Duration;

use auth::AuthConfig;
use auth::application::AdminSeed;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {value:?}")]
    Invalid { name: &'static str, value: String },
}

pub struct ApiConfig {
    pub database: PgConnectOptions,
    pub db_max_connections: u32,
    pub server_port: u16,
    pub request_timeout: Duration,
    pub shutdown_timeout: Duration,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    /// Only set when both admin username and password are configured
    pub admin_seed: Option<AdminSeed>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let token_secret = var("TOKEN_SECRET_KEY").ok_or(ConfigError::Missing("TOKEN_SECRET_KEY"))?;

        let mut auth = AuthConfig::new(token_secret).with_pepper(var("PASSWORD_HASH_SALT"));
        auth.cookie_secure = parse_or("COOKIE_SECURE", var("COOKIE_SECURE"), false, parse_bool)?;

        let database = match var("DATABASE_URL") {
            Some(url) => url.parse::<PgConnectOptions>().map_err(|_| ConfigError::Invalid {
                name: "DATABASE_URL",
                value: "[REDACTED]".to_string(),
            })?,
            None => {
                let mut options = PgConnectOptions::new()
                    .host(&var("DB_HOST").unwrap_or_else(|| "localhost".to_string()))
                    .port(parse_or("DB_PORT", var("DB_PORT"), 5432u16, |v| v.parse().ok())?)
                    .username(&var("DB_USERNAME").unwrap_or_else(|| "postgres".to_string()))
                    .database(&var("DB_DBNAME").unwrap_or_else(|| "postgres".to_string()))
                    .ssl_mode(parse_or(
                        "DB_SSLMODE",
                        var("DB_SSLMODE"),
                        PgSslMode::Disable,
                        |v| v.parse().ok(),
                    )?);
                // passed as a field, never spliced into a URL
                if let Some(password) = var("DB_PASSWORD") {
                    options = options.password(&password);
                }
                options
            }
        };

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let admin_seed = match (var("ADMIN_USERNAME"), var("ADMIN_PASSWORD")) {
            (Some(user_name), Some(password)) => Some(AdminSeed {
                user_name,
                password,
                email: var("ADMIN_EMAIL").unwrap_or_else(|| "admin@example.com".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            database,
            db_max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                var("DB_MAX_CONNECTIONS"),
                5,
                |v| v.parse().ok().filter(|n| *n > 0),
            )?,
            server_port: parse_or("SERVER_PORT", var("SERVER_PORT"), 8080, |v| v.parse().ok())?,
            request_timeout: parse_or(
                "SERVER_REQUEST_TIMEOUT_SECS",
                var("SERVER_REQUEST_TIMEOUT_SECS"),
                Duration::from_secs(10),
                parse_secs,
            )?,
            shutdown_timeout: parse_or(
                "SHUTDOWN_TIMEOUT_SECS",
                var("SHUTDOWN_TIMEOUT_SECS"),
                Duration::from_secs(10),
                parse_secs,
            )?,
            frontend_origins,
            auth,
            admin_seed,
        })
    }
}

fn parse_or<T>(
    name: &'static str,
    raw: Option<String>,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => parse(value.trim()).ok_or(ConfigError::Invalid { name, value }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_secs(value: &str) -> Option<Duration> {
    value.parse().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("TOKEN_SECRET_KEY", "s3cret")]).unwrap();

        assert_eq!(config.database.get_host(), "localhost");
        assert_eq!(config.database.get_port(), 5432);
        assert_eq!(config.database.get_username(), "postgres");
        assert_eq!(config.database.get_database(), Some("postgres"));
        assert!(matches!(config.database.get_ssl_mode(), PgSslMode::Disable));
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(10));
        assert_eq!(config.frontend_origins, vec!["http://localhost:5173"]);
        assert!(!config.auth.cookie_secure);
        assert!(config.auth.password_pepper.is_none());
        assert!(config.admin_seed.is_none());
    }

    #[test]
    fn test_token_secret_is_required() {
        assert!(matches!(
            load(&[]),
            Err(ConfigError::Missing("TOKEN_SECRET_KEY"))
        ));
        assert!(matches!(
            load(&[("TOKEN_SECRET_KEY", "  ")]),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn test_database_url_wins_over_parts() {
        let config = load(&[
            ("TOKEN_SECRET_KEY", "s3cret"),
            ("DATABASE_URL", "postgres://u:p@db/app"),
            ("DB_HOST", "ignored"),
        ])
        .unwrap();
        assert_eq!(config.database.get_host(), "db");
        assert_eq!(config.database.get_username(), "u");
        assert_eq!(config.database.get_database(), Some("app"));
    }

    #[test]
    fn test_database_url_from_parts() {
        let config = load(&[
            ("TOKEN_SECRET_KEY", "s3cret"),
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("DB_USERNAME", "app"),
            ("DB_PASSWORD", "pw"),
            ("DB_DBNAME", "users"),
            ("DB_SSLMODE", "require"),
        ])
        .unwrap();
        assert_eq!(config.database.get_host(), "db");
        assert_eq!(config.database.get_port(), 6543);
        assert_eq!(config.database.get_username(), "app");
        assert_eq!(config.database.get_database(), Some("users"));
        assert!(matches!(config.database.get_ssl_mode(), PgSslMode::Require));
    }

    #[test]
    fn test_reserved_characters_in_credentials() {
        let config = load(&[
            ("TOKEN_SECRET_KEY", "s3cret"),
            ("DB_HOST", "db"),
            ("DB_USERNAME", "app:user"),
            ("DB_PASSWORD", "p@ss/w#rd"),
            ("DB_DBNAME", "users?x"),
        ])
        .unwrap();
        assert_eq!(config.database.get_host(), "db");
        assert_eq!(config.database.get_port(), 5432);
        assert_eq!(config.database.get_username(), "app:user");
        assert_eq!(config.database.get_database(), Some("users?x"));
    }

    #[test]
    fn test_invalid_ssl_mode() {
        let err = load(&[("TOKEN_SECRET_KEY", "s3cret"), ("DB_SSLMODE", "sometimes")]);
        assert!(matches!(
            err,
            Err(ConfigError::Invalid {
                name: "DB_SSLMODE",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let err = load(&[("TOKEN_SECRET_KEY", "s3cret"), ("SERVER_PORT", "http")]);
        assert!(matches!(
            err,
            Err(ConfigError::Invalid {
                name: "SERVER_PORT",
                ..
            })
        ));

        let err = load(&[("TOKEN_SECRET_KEY", "s3cret"), ("DB_MAX_CONNECTIONS", "0")]);
        assert!(err.is_err());
    }

    #[test]
    fn test_cookie_and_origins() {
        let config = load(&[
            ("TOKEN_SECRET_KEY", "s3cret"),
            ("COOKIE_SECURE", "true"),
            ("FRONTEND_ORIGINS", "https://a.example, https://b.example,"),
        ])
        .unwrap();
        assert!(config.auth.cookie_secure);
        assert_eq!(
            config.frontend_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_admin_seed_needs_both_credentials() {
        let only_name = load(&[("TOKEN_SECRET_KEY", "s3cret"), ("ADMIN_USERNAME", "root")]);
        assert!(only_name.unwrap().admin_seed.is_none());

        let config = load(&[
            ("TOKEN_SECRET_KEY", "s3cret"),
            ("ADMIN_USERNAME", "root"),
            ("ADMIN_PASSWORD", "root-password"),
        ])
        .unwrap();
        let seed = config.admin_seed.unwrap();
        assert_eq!(seed.user_name, "root");
        assert_eq!(seed.email, "admin@example.com");
    }
}
