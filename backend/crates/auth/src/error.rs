//! Auth Error Types
//!
//! Auth-specific failures. Every variant collapses into a
//! `kernel::error::AppError` at the HTTP boundary.

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordHashError;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Input failed validation; the message is shown to the client.
    #[error("{0}")]
    Validation(String),

    #[error("user not found")]
    UserNotFound,

    #[error("username already taken")]
    UserNameTaken,

    /// Unknown username and wrong password are deliberately the same error.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("no refresh token provided")]
    MissingRefreshToken,

    #[error("invalid refresh token")]
    SessionInvalid,

    #[error("refresh token expired")]
    SessionExpired,

    #[error("empty auth header")]
    MissingAuthHeader,

    #[error("invalid auth header")]
    InvalidAuthHeader,

    /// Access token rejected by the codec; carries the reason.
    #[error("{0}")]
    InvalidToken(String),

    #[error("access denied")]
    AccessDenied,

    #[error("failed to sign token: {0}")]
    TokenSigning(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    PasswordHash(#[from] PasswordHashError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::UserNameTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::MissingRefreshToken
            | AuthError::SessionInvalid
            | AuthError::SessionExpired
            | AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken(_) => ErrorKind::Unauthorized,
            AuthError::AccessDenied => ErrorKind::Forbidden,
            AuthError::Database(e) => database_kind(e),
            AuthError::TokenSigning(_)
            | AuthError::Config(_)
            | AuthError::PasswordHash(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Client-facing error. Server-side details stay in the logs.
    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::Database(e) => AppError::from(e),
            e if e.kind().is_server_error() => {
                AppError::new(e.kind(), "internal server error").with_source(e)
            }
            e => AppError::new(e.kind(), e.to_string()),
        }
    }

    pub fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            e if e.kind().is_server_error() => {
                tracing::error!(error = %e, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid sign-in attempt");
            }
            AuthError::InvalidToken(reason) => {
                tracing::warn!(reason = %reason, "Access token rejected");
            }
            AuthError::SessionInvalid | AuthError::SessionExpired => {
                tracing::warn!(error = %self, "Refresh rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

fn database_kind(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorKind::ServiceUnavailable
        }
        _ => ErrorKind::InternalServerError,
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

/// Value objects report validation failures as `AppError`s.
impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(err: JsonRejection) -> Self {
        tracing::debug!(error = %err, "Rejected request body");
        AuthError::Validation("invalid input body".to_string())
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("blocking task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AuthError::Validation("x".into()).kind().status_code(), 400);
        assert_eq!(AuthError::InvalidCredentials.kind().status_code(), 401);
        assert_eq!(AuthError::SessionExpired.kind().status_code(), 401);
        assert_eq!(AuthError::MissingAuthHeader.kind().status_code(), 401);
        assert_eq!(AuthError::AccessDenied.kind().status_code(), 403);
        assert_eq!(AuthError::UserNotFound.kind().status_code(), 404);
        assert_eq!(AuthError::UserNameTaken.kind().status_code(), 409);
        assert_eq!(AuthError::Internal("x".into()).kind().status_code(), 500);
        assert_eq!(
            AuthError::Database(sqlx::Error::PoolTimedOut)
                .kind()
                .status_code(),
            503
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let app = AuthError::TokenSigning("key material went missing".into()).into_app_error();
        assert_eq!(app.message(), "internal server error");

        let app = AuthError::InvalidToken("token expired".into()).into_app_error();
        assert_eq!(app.message(), "token expired");
    }

    #[test]
    fn test_from_app_error() {
        let err: AuthError = AppError::bad_request("invalid email format").into();
        assert!(matches!(err, AuthError::Validation(ref m) if m == "invalid email format"));
    }
}
