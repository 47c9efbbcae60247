//! In-memory repository
//!
//! Backs the tests here and in dependent crates. Mirrors the PostgreSQL
//! semantics: generated IDs, unique usernames, cascade on user delete.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::entity::{
    session::Session,
    user::{NewUser, User, UserChanges},
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    SessionId, UserId, refresh_token::RefreshToken, user_name::UserName, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    users: BTreeMap<UserId, User>,
    sessions: HashMap<RefreshToken, Session>,
    next_user_id: i64,
    next_session_id: i64,
}

#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    state: Arc<Mutex<State>>,
    fail_session_create: Arc<AtomicBool>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_session` call fail with a database error.
    pub fn fail_next_session_create(&self) {
        self.fail_session_create.store(true, Ordering::SeqCst);
    }

    pub async fn session_count(&self) -> usize {
        self.state.lock().await.sessions.len()
    }

    /// Insert a session with an explicit token, e.g. one that already expired.
    pub async fn insert_session(
        &self,
        user_id: UserId,
        token: RefreshToken,
        expires_at: DateTime<Utc>,
    ) {
        let mut state = self.state.lock().await;
        state.next_session_id += 1;
        let id = SessionId::from_raw(state.next_session_id);
        state.sessions.insert(
            token.clone(),
            Session {
                id,
                user_id,
                refresh_token: token,
                expires_at,
            },
        );
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for InMemoryAuthRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<UserId> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.user_name == user.user_name) {
            return Err(AuthError::UserNameTaken);
        }

        state.next_user_id += 1;
        let id = UserId::from_raw(state.next_user_id);
        state.users.insert(
            id,
            User {
                id,
                role: user.role,
                name: user.name.clone(),
                user_name: user.user_name.clone(),
                email: user.email.clone(),
                password: user.password.clone(),
                city: user.city.clone(),
                registered_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| &u.user_name == user_name)
            .cloned())
    }

    async fn exists_by_user_name(
        &self,
        user_name: &UserName,
        except: Option<UserId>,
    ) -> AuthResult<bool> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .any(|u| &u.user_name == user_name && Some(u.id) != except))
    }

    async fn exists_admin(&self) -> AuthResult<bool> {
        let state = self.state.lock().await;
        Ok(state.users.values().any(|u| u.role.is_admin()))
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        Ok(self.state.lock().await.users.values().cloned().collect())
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> AuthResult<bool> {
        let mut state = self.state.lock().await;
        if let Some(new_name) = &changes.user_name {
            if state
                .users
                .values()
                .any(|u| &u.user_name == new_name && u.id != id)
            {
                return Err(AuthError::UserNameTaken);
            }
        }

        match state.users.get_mut(&id) {
            Some(user) => {
                changes.apply_to(user);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: UserId) -> AuthResult<bool> {
        let mut state = self.state.lock().await;
        let removed = state.users.remove(&id).is_some();
        if removed {
            state.sessions.retain(|_, s| s.user_id != id);
        }
        Ok(removed)
    }

    async fn find_role(&self, id: UserId) -> AuthResult<Option<UserRole>> {
        Ok(self.state.lock().await.users.get(&id).map(|u| u.role))
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for InMemoryAuthRepository {
    async fn create_session(
        &self,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<RefreshToken> {
        if self.fail_session_create.swap(false, Ordering::SeqCst) {
            return Err(AuthError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut state = self.state.lock().await;
        if !state.users.contains_key(&user_id) {
            return Err(AuthError::Internal(format!("no user {user_id} for session")));
        }

        let token = RefreshToken::new(platform::crypto::random_hex_token(32))
            .ok_or_else(|| AuthError::Internal("empty refresh token".to_string()))?;
        state.next_session_id += 1;
        let id = SessionId::from_raw(state.next_session_id);
        state.sessions.insert(
            token.clone(),
            Session {
                id,
                user_id,
                refresh_token: token.clone(),
                expires_at,
            },
        );
        Ok(token)
    }

    async fn find_session(&self, token: &RefreshToken) -> AuthResult<Option<Session>> {
        Ok(self.state.lock().await.sessions.get(token).cloned())
    }

    async fn delete_session(&self, token: &RefreshToken) -> AuthResult<()> {
        self.state.lock().await.sessions.remove(token);
        Ok(())
    }

    async fn purge_expired(&self) -> AuthResult<u64> {
        let now = Utc::now();
        let mut state = self.state.lock().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| !s.is_expired_at(now));
        Ok((before - state.sessions.len()) as u64)
    }
}
