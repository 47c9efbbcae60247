//! Update User Use Case
//!
//! Partial update: absent fields stay as they are, present ones are
//! validated like at sign-up.

use std::sync::Arc;

use auth::AuthError;
use auth::domain::{UserChanges, UserRepository};
use auth::models::{
    UserId,
    email::Email,
    profile_text::ProfileText,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use platform::password::PasswordHasher;

use crate::error::{DirectoryError, DirectoryResult};

#[derive(Debug, Default)]
pub struct UpdateUserInput {
    pub role: Option<String>,
    pub name: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
}

impl UpdateUserInput {
    fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.name.is_none()
            && self.user_name.is_none()
            && self.password.is_none()
            && self.email.is_none()
            && self.city.is_none()
    }
}

pub struct UpdateUserUseCase<U>
where
    U: UserRepository,
{
    users: Arc<U>,
    hasher: Arc<PasswordHasher>,
}

impl<U> UpdateUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>, hasher: Arc<PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// `actor` is the caller's role; only admins may change roles.
    pub async fn execute(
        &self,
        actor: UserRole,
        id: UserId,
        input: UpdateUserInput,
    ) -> DirectoryResult<()> {
        if input.is_empty() {
            return Err(DirectoryError::EmptyUpdate);
        }
        if input.role.is_some() && !actor.is_admin() {
            return Err(DirectoryError::RoleChangeForbidden);
        }

        let role = input.role.as_deref().map(parse_role).transpose()?;
        let name = input
            .name
            .map(|v| ProfileText::new("name", v))
            .transpose()?;
        let user_name = input.user_name.map(UserName::new).transpose()?;
        let email = input.email.map(Email::new).transpose()?;
        let city = input
            .city
            .map(|v| ProfileText::new("city", v))
            .transpose()?;
        let raw_password = input.password.map(RawPassword::new).transpose()?;

        if let Some(user_name) = &user_name {
            if self.users.exists_by_user_name(user_name, Some(id)).await? {
                return Err(AuthError::UserNameTaken.into());
            }
        }

        let password = match raw_password {
            Some(raw) => Some(UserPassword::hash(&self.hasher, raw).await?),
            None => None,
        };

        let changes = UserChanges {
            role,
            name,
            user_name,
            email,
            password,
            city,
        };

        if !self.users.update(id, &changes).await? {
            return Err(AuthError::UserNotFound.into());
        }

        tracing::info!(
            user_id = %id,
            role_changed = changes.role.is_some(),
            password_changed = changes.password.is_some(),
            "User updated"
        );

        Ok(())
    }
}

pub(crate) fn parse_role(code: &str) -> DirectoryResult<UserRole> {
    UserRole::from_code(code)
        .ok_or_else(|| AuthError::Validation("role must be admin or user".to_string()).into())
}
