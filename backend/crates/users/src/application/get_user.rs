//! Read Use Cases

use std::sync::Arc;

use auth::AuthError;
use auth::domain::{User, UserRepository};
use auth::models::UserId;

use crate::error::DirectoryResult;

pub struct GetUserUseCase<U>
where
    U: UserRepository,
{
    users: Arc<U>,
}

impl<U> GetUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, id: UserId) -> DirectoryResult<User> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(user)
    }
}

pub struct ListUsersUseCase<U>
where
    U: UserRepository,
{
    users: Arc<U>,
}

impl<U> ListUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Ordered by ID.
    pub async fn execute(&self) -> DirectoryResult<Vec<User>> {
        Ok(self.users.list().await?)
    }
}
