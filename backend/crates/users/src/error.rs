//! User Directory Error Types
//!
//! Directory-specific variants on top of [`AuthError`], which already covers
//! validation, conflicts, missing users and storage failures.

use auth::AuthError;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type DirectoryResult<T> = Result<T, DirectoryError>;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("invalid user id")]
    InvalidUserId,

    #[error("no fields to update")]
    EmptyUpdate,

    #[error("only admin can update role")]
    RoleChangeForbidden,

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl DirectoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DirectoryError::InvalidUserId | DirectoryError::EmptyUpdate => ErrorKind::BadRequest,
            DirectoryError::RoleChangeForbidden => ErrorKind::Forbidden,
            DirectoryError::Auth(e) => e.kind(),
        }
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            DirectoryError::Auth(e) => e.into_app_error(),
            e => AppError::new(e.kind(), e.to_string()),
        }
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        match &self {
            DirectoryError::Auth(e) => e.log(),
            DirectoryError::RoleChangeForbidden => {
                tracing::warn!("Non-admin attempted a role change");
            }
            e => tracing::debug!(error = %e, "Directory error"),
        }
        self.into_app_error().into_response()
    }
}

impl From<JsonRejection> for DirectoryError {
    fn from(err: JsonRejection) -> Self {
        DirectoryError::Auth(err.into())
    }
}

/// Value objects report validation failures as `AppError`s.
impl From<AppError> for DirectoryError {
    fn from(err: AppError) -> Self {
        DirectoryError::Auth(err.into())
    }
}
