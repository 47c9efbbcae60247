//! Conversions into and out of [`AppError`]
//!
//! - `sqlx::Error` -> `AppError` (feature `sqlx`)
//! - axum JSON body rejections -> `AppError` (feature `axum`)
//! - `AppError` -> RFC 7807 problem response (feature `axum`)

#[cfg(any(feature = "sqlx", feature = "axum"))]
use super::app_error::AppError;

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// PostgreSQL `unique_violation`.
pub const PG_UNIQUE_VIOLATION: &str = "23505";

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::not_found("record not found").with_source(err),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                AppError::service_unavailable("database connection pool exhausted").with_source(err)
            }
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                let app_err = match db_err.code().as_deref() {
                    Some(PG_UNIQUE_VIOLATION) => AppError::conflict("duplicate key value"),
                    Some("23503") => AppError::conflict("foreign key violation"),
                    Some("23502") | Some("23514") => {
                        AppError::bad_request("constraint violation")
                    }
                    Some("53000" | "53100" | "53200" | "53300" | "57P01" | "57P02" | "57P03") => {
                        AppError::service_unavailable("database unavailable")
                    }
                    _ => AppError::internal("database error"),
                };
                app_err.with_source(err)
            }
            sqlx::Error::Io(_) => {
                AppError::service_unavailable("database connection error").with_source(err)
            }
            _ => AppError::internal("database error").with_source(err),
        }
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::bad_request("invalid input body").with_source(err)
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details for HTTP APIs
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
        });

        (
            status,
            [(http::header::CONTENT_TYPE, "application/problem+json")],
            Json(body),
        )
            .into_response()
    }
}
