//! Refresh Token Value Object
//!
//! Opaque session handle generated by the database. Only ever compared for
//! equality; never logged in full.

use std::fmt;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// `None` for an empty value.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        (!value.is_empty()).then_some(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log-safe tag.
    pub fn fingerprint(&self) -> String {
        platform::crypto::fingerprint(&self.0)
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken")
            .field(&self.fingerprint())
            .finish()
    }
}
