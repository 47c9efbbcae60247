//! Free-form profile fields (display name, city).

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

pub const PROFILE_TEXT_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileText(String);

impl ProfileText {
    /// `field` names the input in the error message.
    pub fn new(field: &str, raw: impl AsRef<str>) -> AppResult<Self> {
        let trimmed = raw.as_ref().trim();

        if trimmed.is_empty() {
            return Err(AppError::bad_request(format!("{field} must not be empty")));
        }
        if trimmed.chars().count() > PROFILE_TEXT_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "{field} must be at most {PROFILE_TEXT_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
