//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use platform::cookie::extract_cookie;

use crate::application::{
    AuthServices, RefreshUseCase, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase,
    TokenPair,
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::refresh_token::RefreshToken;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccessTokenResponse, CreatedResponse, SignInRequest, SignUpRequest,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub services: AuthServices,
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /auth/sign-up
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    body: Result<Json<SignUpRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = body?;

    let use_case = SignUpUseCase::new(state.repo.clone(), state.services.hasher.clone());
    let output = use_case
        .execute(SignUpInput {
            name: req.name,
            user_name: req.username,
            password: req.password,
            email: req.email,
            city: req.city,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: output.user_id }),
    ))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /auth/sign-in
pub async fn sign_in<R>(
    State(state): State<AuthAppState<R>>,
    body: Result<Json<SignInRequest>, JsonRejection>,
) -> AuthResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = body?;

    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.services.clone(),
    );
    let pair = use_case
        .execute(SignInInput {
            user_name: req.username,
            password: req.password,
        })
        .await?;

    token_response(&state.services, pair)
}

// ============================================================================
// Refresh
// ============================================================================

/// GET /auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let token = extract_cookie(&headers, &state.services.config.refresh_cookie_name)
        .and_then(RefreshToken::new)
        .ok_or(AuthError::MissingRefreshToken)?;

    let use_case = RefreshUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.services.clone(),
    );
    let pair = use_case.execute(token).await?;

    token_response(&state.services, pair)
}

// ============================================================================
// Helpers
// ============================================================================

/// `200 {accessToken}` with the refresh token in an HttpOnly cookie.
fn token_response(services: &AuthServices, pair: TokenPair) -> AuthResult<Response> {
    let cookie = services
        .config
        .refresh_cookie()
        .set_cookie_header(pair.refresh_token.as_str())
        .map_err(|e| AuthError::Internal(format!("refresh cookie header: {e}")))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(AccessTokenResponse {
            access_token: pair.access_token,
        }),
    )
        .into_response())
}
