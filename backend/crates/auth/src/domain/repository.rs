//! Repository Traits
//!
//! Persistence ports. PostgreSQL lives in `infra::postgres`, the in-memory
//! variant in `infra::memory`.

use chrono::{DateTime, Utc};

use crate::domain::entity::{
    session::Session,
    user::{NewUser, User, UserChanges},
};
use crate::domain::value_object::{
    UserId, refresh_token::RefreshToken, user_name::UserName, user_role::UserRole,
};
use crate::error::AuthResult;

#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert and return the generated ID. A taken username is
    /// `AuthError::UserNameTaken`.
    async fn create(&self, user: &NewUser) -> AuthResult<UserId>;

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>>;

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Whether `user_name` belongs to any user other than `except`.
    async fn exists_by_user_name(
        &self,
        user_name: &UserName,
        except: Option<UserId>,
    ) -> AuthResult<bool>;

    async fn exists_admin(&self) -> AuthResult<bool>;

    /// All users, ordered by ID.
    async fn list(&self) -> AuthResult<Vec<User>>;

    /// `false` if no such user.
    async fn update(&self, id: UserId, changes: &UserChanges) -> AuthResult<bool>;

    /// `false` if no such user. Sessions go with it.
    async fn delete(&self, id: UserId) -> AuthResult<bool>;

    async fn find_role(&self, id: UserId) -> AuthResult<Option<UserRole>>;
}

#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Insert a session and return the token the store generated for it.
    async fn create_session(
        &self,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<RefreshToken>;

    async fn find_session(&self, token: &RefreshToken) -> AuthResult<Option<Session>>;

    /// Idempotent.
    async fn delete_session(&self, token: &RefreshToken) -> AuthResult<()>;

    async fn purge_expired(&self) -> AuthResult<u64>;
}
