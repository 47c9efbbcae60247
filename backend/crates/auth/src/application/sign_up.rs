//! Sign Up Use Case
//!
//! Self-service registration. Always creates a plain `user`.

use std::sync::Arc;

use platform::password::PasswordHasher;

use crate::application::create_user::{CreateUserInput, CreateUserUseCase};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{UserId, user_role::UserRole};
use crate::error::AuthResult;

pub struct SignUpInput {
    pub name: String,
    pub user_name: String,
    pub password: String,
    pub email: String,
    pub city: String,
}

pub struct SignUpOutput {
    pub user_id: UserId,
}

pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    create_user: CreateUserUseCase<U>,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>, hasher: Arc<PasswordHasher>) -> Self {
        Self {
            create_user: CreateUserUseCase::new(users, hasher),
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let user_id = self
            .create_user
            .execute(CreateUserInput {
                role: UserRole::User,
                name: input.name,
                user_name: input.user_name,
                password: input.password,
                email: input.email,
                city: input.city,
            })
            .await?;

        Ok(SignUpOutput { user_id })
    }
}
