//! User Directory Router

use std::sync::Arc;

use auth::application::AuthServices;
use auth::domain::UserRepository;
use auth::{AuthGuard, PgAuthRepository, require_admin, require_user};
use axum::{Router, middleware, routing::get};

use crate::presentation::handlers::{self, DirectoryState};

/// Create the directory router with PostgreSQL repository
pub fn users_router(repo: PgAuthRepository, services: AuthServices) -> Router {
    users_router_generic(repo, services)
}

/// `/admin/users` for admins, `/api/users/{id}` for any signed-in user.
pub fn users_router_generic<R>(repo: R, services: AuthServices) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let guard = AuthGuard::from(&services);
    let state = DirectoryState {
        repo: Arc::new(repo),
        services,
    };

    let admin = Router::new()
        .route(
            "/admin/users",
            get(handlers::list_users::<R>).post(handlers::create_user::<R>),
        )
        .route(
            "/admin/users/{id}",
            get(handlers::get_user::<R>)
                .put(handlers::update_user::<R>)
                .delete(handlers::delete_user::<R>),
        )
        .route_layer(middleware::from_fn_with_state(guard.clone(), require_admin));

    let api = Router::new()
        .route(
            "/api/users/{id}",
            get(handlers::get_user::<R>)
                .put(handlers::update_user::<R>)
                .delete(handlers::delete_user::<R>),
        )
        .route_layer(middleware::from_fn_with_state(guard, require_user));

    admin.merge(api).with_state(state)
}
