//! User Password Value Object
//!
//! Domain wrappers over `platform::password`. Hashing and verification run on
//! the blocking pool so Argon2 never stalls a runtime worker.

use std::fmt;
use std::sync::Arc;

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, HashedPassword, PasswordHasher};

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Password as typed by the user. Zeroized on drop.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Apply the password policy. Violations become 400s.
    pub fn new(raw: String) -> AppResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(|e| AppError::bad_request(e.to_string()))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Stored Argon2id hash.
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub async fn hash(hasher: &Arc<PasswordHasher>, raw: RawPassword) -> AuthResult<Self> {
        let hasher = Arc::clone(hasher);
        let hashed = tokio::task::spawn_blocking(move || hasher.hash(&raw.0)).await??;
        Ok(Self(hashed))
    }

    pub async fn verify(&self, hasher: &Arc<PasswordHasher>, raw: RawPassword) -> AuthResult<bool> {
        let hasher = Arc::clone(hasher);
        let hashed = self.0.clone();
        let ok = tokio::task::spawn_blocking(move || hasher.verify(&raw.0, &hashed)).await?;
        Ok(ok)
    }

    /// Hash of a random password nobody knows, with `hasher`'s cost.
    ///
    /// Sign-in verifies against it when the username is unknown.
    pub fn placeholder(hasher: &PasswordHasher) -> AuthResult<Self> {
        let raw = ClearTextPassword::new(platform::crypto::random_hex_token(16))
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(Self(hasher.hash(&raw)?))
    }

    /// Load from the `password_hash` column.
    pub fn from_phc_string(phc_string: impl Into<String>) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc_string)
            .map(Self)
            .map_err(|_| AuthError::Internal("invalid password hash in database".to_string()))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}
