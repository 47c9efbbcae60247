//! Application Configuration
//!
//! Everything the auth flows need from the environment, resolved once at
//! startup and passed in explicitly.

use std::fmt;
use std::time::Duration;

use platform::cookie::CookieConfig;
/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for access tokens
    pub token_secret: String,
    /// Appended to every password before hashing
    pub password_pepper: Option<String>,
    /// `None` uses the hasher's defaults
    pub password_hash_cost: Option<HashCost>,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub refresh_cookie_name: String,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
}

impl AuthConfig {
    /// 30 minute access tokens, 30 day refresh sessions.
    pub fn new(token_secret: impl Into<String>) -> Self {
        Self {
            token_secret: token_secret.into(),
            password_pepper: None,
            password_hash_cost: None,
            access_token_ttl: Duration::from_secs(30 * 60),
            refresh_token_ttl: Duration::from_secs(30 * 24 * 3600),
            refresh_cookie_name: "refreshToken".to_string(),
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
        }
    }

    pub fn with_pepper(mut self, pepper: Option<String>) -> Self {
        self.password_pepper = pepper;
        self
    }

    /// Max-Age follows the refresh TTL, saturating at `i64::MAX` seconds.
    pub fn refresh_cookie(&self) -> CookieConfig {
        let max_age = i64::try_from(self.refresh_token_ttl.as_secs()).unwrap_or(i64::MAX);
        let mut cookie = CookieConfig::new(&self.refresh_cookie_name)
            .secure(self.cookie_secure)
            .max_age_secs(max_age);
        cookie.same_site = self.cookie_same_site;
        cookie
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field(
                "password_pepper",
                &self.password_pepper.as_ref().map(|_| "[REDACTED]"),
            )
            .field("password_hash_cost", &self.password_hash_cost)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("refresh_cookie_name", &self.refresh_cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::new("secret");
        assert_eq!(config.access_token_ttl, Duration::from_secs(1800));
        assert_eq!(config.refresh_token_ttl, Duration::from_secs(2_592_000));

        let cookie = config.refresh_cookie().build_set_cookie("tok");
        assert!(cookie.starts_with("refreshToken=tok"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=2592000"));
    }

    #[test]
    fn test_cookie_max_age_saturates() {
        let mut config = AuthConfig::new("secret");
        config.refresh_token_ttl = Duration::MAX;

        let cookie = config.refresh_cookie();
        assert_eq!(cookie.max_age_secs, Some(i64::MAX));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AuthConfig::new("jwt-secret").with_pepper(Some("pepper-value".into()));
        let debug = format!("{config:?}");
        assert!(!debug.contains("jwt-secret"));
        assert!(!debug.contains("pepper-value"));
    }
}
