//! HTTP Handlers
//!
//! Shared by `/admin/users` and `/api/users`. The route guard decides who
//! gets in; the ownership check here decides which records they reach.

use std::sync::Arc;

use auth::application::{AuthServices, CreateUserInput, CreateUserUseCase};
use auth::domain::UserRepository;
use auth::models::{CreatedResponse, UserId};
use auth::AuthContext;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::update_user::parse_role;
use crate::application::{DeleteUserUseCase, GetUserUseCase, ListUsersUseCase, UpdateUserUseCase};
use crate::error::{DirectoryError, DirectoryResult};
use crate::presentation::dto::{
    CreateUserRequest, StatusResponse, UpdateUserRequest, UserResponse,
};

/// Shared state for directory handlers
#[derive(Clone)]
pub struct DirectoryState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub services: AuthServices,
}

fn parse_user_id(raw: &str) -> DirectoryResult<UserId> {
    raw.parse().map_err(|_| DirectoryError::InvalidUserId)
}

// ============================================================================
// Collection (admin only)
// ============================================================================

/// GET /admin/users
pub async fn list_users<R>(
    State(state): State<DirectoryState<R>>,
) -> DirectoryResult<Json<Vec<UserResponse>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let users = ListUsersUseCase::new(state.repo.clone()).execute().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /admin/users
pub async fn create_user<R>(
    State(state): State<DirectoryState<R>>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> DirectoryResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = body?;
    let role = parse_role(&req.role)?;

    let use_case = CreateUserUseCase::new(state.repo.clone(), state.services.hasher.clone());
    let id = use_case
        .execute(CreateUserInput {
            role,
            name: req.name,
            user_name: req.username,
            password: req.password,
            email: req.email,
            city: req.city,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

// ============================================================================
// Single record
// ============================================================================

/// GET /admin/users/{id}, GET /api/users/{id}
pub async fn get_user<R>(
    State(state): State<DirectoryState<R>>,
    ctx: AuthContext,
    Path(raw_id): Path<String>,
) -> DirectoryResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let id = parse_user_id(&raw_id)?;
    ctx.ensure_can_access(id)?;

    let user = GetUserUseCase::new(state.repo.clone()).execute(id).await?;
    Ok(Json(user.into()))
}

/// PUT /admin/users/{id}, PUT /api/users/{id}
pub async fn update_user<R>(
    State(state): State<DirectoryState<R>>,
    ctx: AuthContext,
    Path(raw_id): Path<String>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> DirectoryResult<Json<StatusResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let id = parse_user_id(&raw_id)?;
    ctx.ensure_can_access(id)?;
    let Json(req) = body?;

    let use_case = UpdateUserUseCase::new(state.repo.clone(), state.services.hasher.clone());
    use_case.execute(ctx.role, id, req.into()).await?;

    Ok(Json(StatusResponse::ok()))
}

/// DELETE /admin/users/{id}, DELETE /api/users/{id}
pub async fn delete_user<R>(
    State(state): State<DirectoryState<R>>,
    ctx: AuthContext,
    Path(raw_id): Path<String>,
) -> DirectoryResult<Json<StatusResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let id = parse_user_id(&raw_id)?;
    ctx.ensure_can_access(id)?;

    DeleteUserUseCase::new(state.repo.clone()).execute(id).await?;

    Ok(Json(StatusResponse::ok()))
}
