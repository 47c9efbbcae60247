//! Refresh Use Case
//!
//! Rotates a refresh session: the old token buys a new access token and a new
//! refresh token, then stops working.

use std::sync::Arc;

use crate::application::services::AuthServices;
use crate::application::sign_in::{TokenPair, start_session};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::refresh_token::RefreshToken;
use crate::error::{AuthError, AuthResult};

pub struct RefreshUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    users: Arc<U>,
    sessions: Arc<S>,
    services: AuthServices,
}

impl<U, S> RefreshUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(users: Arc<U>, sessions: Arc<S>, services: AuthServices) -> Self {
        Self {
            users,
            sessions,
            services,
        }
    }

    /// Nothing touches the old session until the new one exists. Two
    /// concurrent calls with the same token may both succeed.
    pub async fn execute(&self, token: RefreshToken) -> AuthResult<TokenPair> {
        let session = self
            .sessions
            .find_session(&token)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        if session.is_expired() {
            if let Err(e) = self.sessions.delete_session(&token).await {
                tracing::warn!(
                    session = %token.fingerprint(),
                    error = %e,
                    "Failed to delete expired session"
                );
            }
            return Err(AuthError::SessionExpired);
        }

        // Current role, not the one in force when the session was created.
        let role = self
            .users
            .find_role(session.user_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        let pair = start_session(&*self.sessions, &self.services, session.user_id, role).await?;

        if let Err(e) = self.sessions.delete_session(&token).await {
            tracing::warn!(
                user_id = %session.user_id,
                session = %token.fingerprint(),
                error = %e,
                "Failed to delete rotated session"
            );
        }

        tracing::info!(
            user_id = %session.user_id,
            old_session = %token.fingerprint(),
            new_session = %pair.refresh_token.fingerprint(),
            "Session refreshed"
        );

        Ok(pair)
    }
}
