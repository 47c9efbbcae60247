//! Password hashing and verification
//!
//! - Argon2id with a random per-password salt, stored as a PHC string
//! - Optional process-wide pepper supplied at construction
//! - NFKC normalization and a small length/charset policy
//! - Clear text is zeroized on drop and redacted from `Debug`
//!
//! Hashing is CPU and memory heavy. Callers on an async runtime should run
//! [`PasswordHasher::hash`] and [`PasswordHasher::verify`] on the blocking pool.

use std::fmt;

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, Version};
use argon2::{PasswordHasher as _, PasswordVerifier as _};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

// ============================================================================
// Constants
// ============================================================================

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violations, reported back to the client as validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("password must be at least {min} characters")]
    TooShort { min: usize, actual: usize },

    #[error("password must be at most {max} characters")]
    TooLong { max: usize, actual: usize },

    #[error("password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("password contains invalid control characters")]
    InvalidCharacter,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    #[error("invalid password hash format")]
    InvalidHashFormat,

    #[error("invalid argon2 parameters: {0}")]
    InvalidParams(String),
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password, wiped from memory when dropped.
///
/// Not `Clone`, and `Debug` prints `[REDACTED]`.
///
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// assert!(ClearTextPassword::new("hunter22".to_string()).is_ok());
/// assert!(ClearTextPassword::new("abc".to_string()).is_err());
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalize (NFKC) and validate.
    ///
    /// Length is counted in code points after normalization. Control
    /// characters other than space, tab and newline are rejected.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let raw = Zeroizing::new(raw);
        let normalized: String = raw.nfkc().collect();
        let candidate = Self(normalized);

        if candidate.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = candidate.0.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if candidate
            .0
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(candidate)
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format (algorithm, params, salt, digest).
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Load a stored hash, rejecting anything that is not a PHC string.
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// Argon2id hasher configured once at startup.
///
/// ```rust
/// use platform::password::{ClearTextPassword, PasswordHasher};
///
/// let hasher = PasswordHasher::new(Some("pepper".to_string()))
///     .with_params(1024, 1, 1)
///     .unwrap();
/// let password = ClearTextPassword::new("hunter22".to_string()).unwrap();
/// let hashed = hasher.hash(&password).unwrap();
/// assert!(hasher.verify(&password, &hashed));
/// ```
#[derive(Clone)]
pub struct PasswordHasher {
    pepper: Option<Zeroizing<Vec<u8>>>,
    params: Params,
}

impl PasswordHasher {
    /// OWASP defaults (m=19 MiB, t=2, p=1). An empty pepper counts as none.
    pub fn new(pepper: Option<String>) -> Self {
        let pepper = pepper
            .filter(|p| !p.is_empty())
            .map(|p| Zeroizing::new(p.into_bytes()));
        Self {
            pepper,
            params: Params::default(),
        }
    }

    /// Override the cost parameters (memory in KiB, iterations, lanes).
    pub fn with_params(
        mut self,
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordHashError> {
        self.params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordHashError::InvalidParams(e.to_string()))?;
        Ok(self)
    }

    pub fn has_pepper(&self) -> bool {
        self.pepper.is_some()
    }

    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let input = self.peppered(password);
        let salt = SaltString::generate(OsRng);

        let hash = self
            .argon2()
            .hash_password(&input, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }

    /// Constant-time check against a stored hash. Parameters are read from
    /// the PHC string, so hashes made with older costs still verify.
    pub fn verify(&self, password: &ClearTextPassword, hashed: &HashedPassword) -> bool {
        let Ok(parsed) = PasswordHash::new(&hashed.hash) else {
            return false;
        };
        let input = self.peppered(password);
        self.argon2().verify_password(&input, &parsed).is_ok()
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn peppered(&self, password: &ClearTextPassword) -> Zeroizing<Vec<u8>> {
        let mut input = Zeroizing::new(password.as_bytes().to_vec());
        if let Some(pepper) = &self.pepper {
            input.extend_from_slice(pepper);
        }
        input
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap(pepper: Option<&str>) -> PasswordHasher {
        PasswordHasher::new(pepper.map(str::to_string))
            .with_params(1024, 1, 1)
            .unwrap()
    }

    fn pw(s: &str) -> ClearTextPassword {
        ClearTextPassword::new(s.to_string()).unwrap()
    }

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("12345".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::TooShort { min: 6, actual: 5 })
        ));
        assert!(ClearTextPassword::new("123456".to_string()).is_ok());
    }

    #[test]
    fn test_password_too_long() {
        let result = ClearTextPassword::new("a".repeat(MAX_PASSWORD_LENGTH + 1));
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_empty_or_whitespace() {
        for raw in ["", "         "] {
            assert!(matches!(
                ClearTextPassword::new(raw.to_string()),
                Err(PasswordPolicyError::EmptyOrWhitespace)
            ));
        }
    }

    #[test]
    fn test_password_control_character() {
        let result = ClearTextPassword::new("abc\u{0007}defg".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::InvalidCharacter)));
    }

    #[test]
    fn test_unicode_password_counts_code_points() {
        // six code points, far more than six bytes
        assert!(ClearTextPassword::new("пароль".to_string()).is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = cheap(None);
        let hashed = hasher.hash(&pw("correct horse")).unwrap();

        assert!(hasher.verify(&pw("correct horse"), &hashed));
        assert!(!hasher.verify(&pw("wrong horse"), &hashed));
    }

    #[test]
    fn test_same_password_hashes_differ() {
        let hasher = cheap(None);
        let a = hasher.hash(&pw("correct horse")).unwrap();
        let b = hasher.hash(&pw("correct horse")).unwrap();
        assert_ne!(a.as_phc_string(), b.as_phc_string());
    }

    #[test]
    fn test_pepper_must_match() {
        let peppered = cheap(Some("salt-from-env"));
        let hashed = peppered.hash(&pw("correct horse")).unwrap();

        assert!(peppered.verify(&pw("correct horse"), &hashed));
        assert!(!cheap(None).verify(&pw("correct horse"), &hashed));
        assert!(!cheap(Some("other")).verify(&pw("correct horse"), &hashed));
    }

    #[test]
    fn test_empty_pepper_is_no_pepper() {
        assert!(!PasswordHasher::new(Some(String::new())).has_pepper());
        assert!(PasswordHasher::new(Some("x".to_string())).has_pepper());
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let hasher = cheap(None);
        let hashed = hasher.hash(&pw("correct horse")).unwrap();
        assert!(hashed.as_phc_string().starts_with("$argon2id$"));

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(hasher.verify(&pw("correct horse"), &restored));
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(HashedPassword::from_phc_string("not_a_valid_hash").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let debug_output = format!("{:?}", pw("secret-value"));
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret-value"));

        let hasher_debug = format!("{:?}", cheap(Some("pepper-value")));
        assert!(!hasher_debug.contains("pepper-value"));
    }
}
