//! Delete User Use Case

use std::sync::Arc;

use auth::AuthError;
use auth::domain::UserRepository;
use auth::models::UserId;

use crate::error::DirectoryResult;

pub struct DeleteUserUseCase<U>
where
    U: UserRepository,
{
    users: Arc<U>,
}

impl<U> DeleteUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// The user's refresh sessions are removed with it.
    pub async fn execute(&self, id: UserId) -> DirectoryResult<()> {
        if !self.users.delete(id).await? {
            return Err(AuthError::UserNotFound.into());
        }

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
