//! Session Entity
//!
//! One refresh-token lineage step. Rows are immutable: refresh creates a new
//! session and deletes the old one.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{SessionId, UserId, refresh_token::RefreshToken};

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub refresh_token: RefreshToken,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
