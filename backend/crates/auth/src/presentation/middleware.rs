//! Auth Middleware
//!
//! Bearer-token guards for protected routes. A successful check attaches an
//! [`AuthContext`] to the request; handlers take it as an extractor.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::application::{AccessTokenCodec, AuthServices};
use crate::domain::value_object::{UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Request Context
// ============================================================================

/// Identity of the caller, taken from a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: UserId,
    pub role: UserRole,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Admins reach every record, users only their own.
    pub fn can_access(&self, target: UserId) -> bool {
        self.is_admin() || self.user_id == target
    }

    pub fn ensure_can_access(&self, target: UserId) -> AuthResult<()> {
        if self.can_access(target) {
            Ok(())
        } else {
            Err(AuthError::AccessDenied)
        }
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only present behind one of the guards below.
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(AuthError::MissingAuthHeader)
    }
}

// ============================================================================
// Guard
// ============================================================================

/// Middleware state
#[derive(Clone)]
pub struct AuthGuard {
    tokens: Arc<AccessTokenCodec>,
}

impl AuthGuard {
    pub fn new(tokens: Arc<AccessTokenCodec>) -> Self {
        Self { tokens }
    }

    /// Resolve `Authorization: Bearer <token>` into a caller identity.
    pub fn authenticate(&self, headers: &HeaderMap) -> AuthResult<AuthContext> {
        let value = headers
            .get(header::AUTHORIZATION)
            .map(|v| v.to_str().map_err(|_| AuthError::InvalidAuthHeader))
            .transpose()?
            .unwrap_or_default();

        if value.is_empty() {
            return Err(AuthError::MissingAuthHeader);
        }

        let parts: Vec<&str> = value.split(' ').collect();
        let [scheme, token] = parts.as_slice() else {
            return Err(AuthError::InvalidAuthHeader);
        };
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(AuthError::InvalidAuthHeader);
        }

        let access = self.tokens.verify(token)?;

        Ok(AuthContext {
            user_id: access.user_id,
            role: access.role,
        })
    }
}

impl From<&AuthServices> for AuthGuard {
    fn from(services: &AuthServices) -> Self {
        Self::new(services.tokens.clone())
    }
}

/// Middleware that requires any valid access token
pub async fn require_user(
    State(guard): State<AuthGuard>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let ctx = guard.authenticate(req.headers())?;
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

/// Middleware that requires an admin access token
pub async fn require_admin(
    State(guard): State<AuthGuard>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let ctx = guard.authenticate(req.headers())?;
    if !ctx.is_admin() {
        tracing::warn!(user_id = %ctx.user_id, "Non-admin on admin route");
        return Err(AuthError::AccessDenied);
    }
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::HeaderValue;

    use super::*;

    fn guard() -> (AuthGuard, AuthServices) {
        let services = AuthServices::testing();
        (AuthGuard::from(&services), services)
    }

    fn bearer(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_authenticate_valid_token() {
        let (guard, services) = guard();
        let token = services
            .tokens
            .issue(Duration::from_secs(60), UserId::from_raw(3), UserRole::Admin)
            .unwrap();

        let ctx = guard.authenticate(&bearer(&format!("Bearer {token}"))).unwrap();
        assert_eq!(ctx.user_id, UserId::from_raw(3));
        assert!(ctx.is_admin());

        // scheme is case-insensitive
        assert!(guard.authenticate(&bearer(&format!("bearer {token}"))).is_ok());
    }

    #[test]
    fn test_authenticate_missing_header() {
        let (guard, _) = guard();
        assert!(matches!(
            guard.authenticate(&HeaderMap::new()),
            Err(AuthError::MissingAuthHeader)
        ));
        assert!(matches!(
            guard.authenticate(&bearer("")),
            Err(AuthError::MissingAuthHeader)
        ));
    }

    #[test]
    fn test_authenticate_malformed_header() {
        let (guard, _) = guard();
        for value in ["Bearer", "Token abc", "Bearer a b", "Bearer  abc"] {
            let err = guard.authenticate(&bearer(value)).unwrap_err();
            assert!(
                matches!(err, AuthError::InvalidAuthHeader),
                "{value:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_authenticate_bad_token_reports_reason() {
        let (guard, _) = guard();
        let err = guard.authenticate(&bearer("Bearer not-a-jwt")).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
        assert_eq!(err.kind().status_code(), 401);
    }

    #[test]
    fn test_ownership() {
        let user = AuthContext {
            user_id: UserId::from_raw(1),
            role: UserRole::User,
        };
        assert!(user.ensure_can_access(UserId::from_raw(1)).is_ok());
        assert!(matches!(
            user.ensure_can_access(UserId::from_raw(2)),
            Err(AuthError::AccessDenied)
        ));

        let admin = AuthContext {
            user_id: UserId::from_raw(9),
            role: UserRole::Admin,
        };
        assert!(admin.can_access(UserId::from_raw(2)));
    }
}
