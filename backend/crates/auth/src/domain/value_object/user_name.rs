//! User Name Value Object
//!
//! The login handle. Unique across users and matched exactly (case-sensitive)
//! at sign-in.
//!
//! ## Invariants
//! - 1..=64 characters after trimming surrounding whitespace
//! - no whitespace or control characters inside

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

pub const USER_NAME_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let trimmed = raw.as_ref().trim();

        if trimmed.is_empty() {
            return Err(AppError::bad_request("username must not be empty"));
        }

        if trimmed.chars().count() > USER_NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "username must be at most {USER_NAME_MAX_LENGTH} characters"
            )));
        }

        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(AppError::bad_request(
                "username must not contain whitespace or control characters",
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Trusted value read back from the database.
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_valid() {
        assert_eq!(UserName::new("alice").unwrap().as_str(), "alice");
        assert_eq!(UserName::new("  bob_99 ").unwrap().as_str(), "bob_99");
        assert!(UserName::new("Ünïcödé").is_ok());
    }

    #[test]
    fn test_user_name_is_case_sensitive() {
        assert_ne!(UserName::new("Alice").unwrap(), UserName::new("alice").unwrap());
    }

    #[test]
    fn test_user_name_invalid() {
        assert!(UserName::new("").is_err());
        assert!(UserName::new("   ").is_err());
        assert!(UserName::new("two words").is_err());
        assert!(UserName::new("tab\there").is_err());
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)).is_err());
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
    }
}
