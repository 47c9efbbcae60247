//! Create User Use Case
//!
//! Validates and stores a new account with an explicit role. Sign-up, the
//! admin directory and the startup bootstrap all go through here.

use std::sync::Arc;

use platform::password::PasswordHasher;

use crate::domain::entity::user::NewUser;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    UserId, email::Email, profile_text::ProfileText, user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

pub struct CreateUserInput {
    pub role: UserRole,
    pub name: String,
    pub user_name: String,
    pub password: String,
    pub email: String,
    pub city: String,
}

pub struct CreateUserUseCase<U>
where
    U: UserRepository,
{
    users: Arc<U>,
    hasher: Arc<PasswordHasher>,
}

impl<U> CreateUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>, hasher: Arc<PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    pub async fn execute(&self, input: CreateUserInput) -> AuthResult<UserId> {
        let name = ProfileText::new("name", &input.name)?;
        let user_name = UserName::new(&input.user_name)?;
        let email = Email::new(&input.email)?;
        let city = ProfileText::new("city", &input.city)?;
        let raw_password = RawPassword::new(input.password)?;

        // The unique index still decides concurrent inserts.
        if self.users.exists_by_user_name(&user_name, None).await? {
            return Err(AuthError::UserNameTaken);
        }

        let password = UserPassword::hash(&self.hasher, raw_password).await?;

        let user_id = self
            .users
            .create(&NewUser {
                role: input.role,
                name,
                user_name: user_name.clone(),
                email,
                password,
                city,
            })
            .await?;

        tracing::info!(
            user_id = %user_id,
            user_name = %user_name,
            role = %input.role,
            "User created"
        );

        Ok(user_id)
    }
}
