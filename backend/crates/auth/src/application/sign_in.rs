//! Sign In Use Case
//!
//! Verifies username and password, then issues an access token and opens a
//! refresh session.

use std::sync::Arc;

use chrono::Utc;

use crate::application::services::AuthServices;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    UserId, refresh_token::RefreshToken, user_name::UserName, user_password::RawPassword,
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

pub struct SignInInput {
    pub user_name: String,
    pub password: String,
}

/// Access token plus the refresh token backing it.
#[derive(Debug)]
pub struct TokenPair {
    pub user_id: UserId,
    pub access_token: String,
    pub refresh_token: RefreshToken,
}

pub struct SignInUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    users: Arc<U>,
    sessions: Arc<S>,
    services: AuthServices,
}

impl<U, S> SignInUseCase<U, S>
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

    pub async fn execute(&self, input: SignInInput) -> AuthResult<TokenPair> {
        // Malformed input can never match a stored account.
        let user_name =
            UserName::new(&input.user_name).map_err(|_| AuthError::InvalidCredentials)?;
        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(user) = self.users.find_by_user_name(&user_name).await? else {
            // Pay the same Argon2 cost as a wrong password.
            self.services
                .dummy_password
                .verify(&self.services.hasher, raw_password)
                .await?;
            return Err(AuthError::InvalidCredentials);
        };

        if !user
            .password
            .verify(&self.services.hasher, raw_password)
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }

        let pair = start_session(&*self.sessions, &self.services, user.id, user.role).await?;

        tracing::info!(
            user_id = %user.id,
            session = %pair.refresh_token.fingerprint(),
            "User signed in"
        );

        Ok(pair)
    }
}

/// Issue an access token for `role`, then persist a new refresh session.
pub(crate) async fn start_session<S>(
    sessions: &S,
    services: &AuthServices,
    user_id: UserId,
    role: UserRole,
) -> AuthResult<TokenPair>
where
    S: SessionRepository,
{
    let config = &services.config;
    let access_token = services
        .tokens
        .issue(config.access_token_ttl, user_id, role)?;

    let refresh_ttl = chrono::Duration::from_std(config.refresh_token_ttl)
        .map_err(|e| AuthError::Config(format!("refresh token ttl: {e}")))?;
    let refresh_token = sessions
        .create_session(user_id, Utc::now() + refresh_ttl)
        .await?;

    Ok(TokenPair {
        user_id,
        access_token,
        refresh_token,
    })
}
