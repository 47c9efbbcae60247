//! Auth Router

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::application::AuthServices;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, services: AuthServices) -> Router {
    auth_router_generic(repo, services)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, services: AuthServices) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        services,
    };

    Router::new()
        .route("/sign-up", post(handlers::sign_up::<R>))
        .route("/sign-in", post(handlers::sign_in::<R>))
        .route("/refresh", get(handlers::refresh::<R>))
        .with_state(state)
}
