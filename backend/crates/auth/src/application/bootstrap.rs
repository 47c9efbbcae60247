//! Admin bootstrap
//!
//! Creates the first admin from configured credentials when none exists.

use std::sync::Arc;

use platform::password::PasswordHasher;

use crate::application::create_user::{CreateUserInput, CreateUserUseCase};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{UserId, user_role::UserRole};
use crate::error::AuthResult;

pub struct AdminSeed {
    pub user_name: String,
    pub password: String,
    pub email: String,
}

pub struct EnsureAdminUseCase<U>
where
    U: UserRepository,
{
    users: Arc<U>,
    create_user: CreateUserUseCase<U>,
}

impl<U> EnsureAdminUseCase<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>, hasher: Arc<PasswordHasher>) -> Self {
        Self {
            create_user: CreateUserUseCase::new(users.clone(), hasher),
            users,
        }
    }

    /// `Some(id)` if an admin was created, `None` if one already existed.
    pub async fn execute(&self, seed: AdminSeed) -> AuthResult<Option<UserId>> {
        if self.users.exists_admin().await? {
            tracing::debug!("Admin account already present");
            return Ok(None);
        }

        let user_id = self
            .create_user
            .execute(CreateUserInput {
                role: UserRole::Admin,
                name: seed.user_name.clone(),
                user_name: seed.user_name,
                password: seed.password,
                email: seed.email,
                city: "-".to_string(),
            })
            .await?;

        tracing::info!(user_id = %user_id, "Bootstrap admin created");
        Ok(Some(user_id))
    }
}
