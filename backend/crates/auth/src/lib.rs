//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, guards
//!
//! ## Features
//! - Sign-up and sign-in with username + password
//! - Short-lived HS256 access tokens, sent as `Authorization: Bearer`
//! - Rotating refresh sessions stored server-side, sent as an HttpOnly cookie
//! - Role-based guards (`user`, `admin`) with a typed request context
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optionally peppered
//! - Sign-in failures never reveal whether the username exists
//! - A refresh token works exactly once

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{AuthConfig, AuthServices};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::middleware::{AuthContext, AuthGuard, require_admin, require_user};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
