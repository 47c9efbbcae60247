//! API DTOs (Data Transfer Objects)

use auth::domain::User;
use auth::models::{UserId, user_role::UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::UpdateUserInput;

/// Public view of a user. There is no password field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub role: UserRole,
    pub name: String,
    pub username: String,
    pub email: String,
    pub city: String,
    pub registered_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            name: user.name.as_str().to_string(),
            username: user.user_name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            city: user.city.as_str().to_string(),
            registered_at: user.registered_at,
        }
    }
}

/// Admin-side creation; `role` is `admin` or `user`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub role: String,
    pub name: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub role: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            role: req.role,
            name: req.name,
            user_name: req.username,
            password: req.password,
            email: req.email,
            city: req.city,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
