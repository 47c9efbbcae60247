//! User Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    UserId, email::Email, profile_text::ProfileText, user_name::UserName,
    user_password::UserPassword, user_role::UserRole,
};

/// Stored user account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub role: UserRole,
    pub name: ProfileText,
    pub user_name: UserName,
    pub email: Email,
    pub password: UserPassword,
    pub city: ProfileText,
    pub registered_at: DateTime<Utc>,
}

/// A user about to be inserted; ID and registration time come from the database.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub role: UserRole,
    pub name: ProfileText,
    pub user_name: UserName,
    pub email: Email,
    pub password: UserPassword,
    pub city: ProfileText,
}

/// Partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub role: Option<UserRole>,
    pub name: Option<ProfileText>,
    pub user_name: Option<UserName>,
    pub email: Option<Email>,
    pub password: Option<UserPassword>,
    pub city: Option<ProfileText>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.name.is_none()
            && self.user_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.city.is_none()
    }

    pub fn apply_to(&self, user: &mut User) {
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(user_name) = &self.user_name {
            user.user_name = user_name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(password) = &self.password {
            user.password = password.clone();
        }
        if let Some(city) = &self.city {
            user.city = city.clone();
        }
    }
}
