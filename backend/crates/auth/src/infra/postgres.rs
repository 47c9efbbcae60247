//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::PG_UNIQUE_VIOLATION;
use sqlx::PgPool;

use crate::domain::entity::{
    session::Session,
    user::{NewUser, User, UserChanges},
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    SessionId, UserId, email::Email, profile_text::ProfileText, refresh_token::RefreshToken,
    user_name::UserName, user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed users and sessions.
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique violations on `users.username` surface as a taken username.
fn map_user_write_error(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
            return AuthError::UserNameTaken;
        }
    }
    AuthError::Database(err)
}

// ============================================================================
// User Repository Implementation
// ============================================================================

const USER_COLUMNS: &str =
    "id, role, name, username, email, password_hash, city, registered_at";

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<UserId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (role, name, username, email, password_hash, city)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(user.role.code())
        .bind(user.name.as_str())
        .bind(user.user_name.as_str())
        .bind(user.email.as_str())
        .bind(user.password.as_phc_string())
        .bind(user.city.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_write_error)?;

        Ok(UserId::from_raw(id))
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(user_name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn exists_by_user_name(
        &self,
        user_name: &UserName,
        except: Option<UserId>,
    ) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE username = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(user_name.as_str())
        .bind(except.map(|id| id.as_i64()))
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_admin(&self) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE role = 'admin')",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> AuthResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                role = COALESCE($2, role),
                name = COALESCE($3, name),
                username = COALESCE($4, username),
                email = COALESCE($5, email),
                password_hash = COALESCE($6, password_hash),
                city = COALESCE($7, city)
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(changes.role.map(|r| r.code()))
        .bind(changes.name.as_ref().map(|v| v.as_str()))
        .bind(changes.user_name.as_ref().map(|v| v.as_str()))
        .bind(changes.email.as_ref().map(|v| v.as_str()))
        .bind(changes.password.as_ref().map(|v| v.as_phc_string()))
        .bind(changes.city.as_ref().map(|v| v.as_str()))
        .execute(&self.pool)
        .await
        .map_err(map_user_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: UserId) -> AuthResult<bool> {
        // sessions.user_id cascades
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_role(&self, id: UserId) -> AuthResult<Option<UserRole>> {
        let code = sqlx::query_scalar::<_, String>("SELECT role FROM users WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        code.map(|c| parse_role(&c)).transpose()
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn create_session(
        &self,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<RefreshToken> {
        // refresh_token is filled in by the column default
        let token = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO sessions (user_id, expires_at)
            VALUES ($1, $2)
            RETURNING refresh_token
            "#,
        )
        .bind(user_id.as_i64())
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        RefreshToken::new(token)
            .ok_or_else(|| AuthError::Internal("database returned an empty refresh token".into()))
    }

    async fn find_session(&self, token: &RefreshToken) -> AuthResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, refresh_token, expires_at
            FROM sessions
            WHERE refresh_token = $1
            "#,
        )
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(SessionRow::into_session).transpose()
    }

    async fn delete_session(&self, token: &RefreshToken) -> AuthResult<()> {
        sqlx::query("DELETE FROM sessions WHERE refresh_token = $1")
            .bind(token.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn purge_expired(&self) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Purged expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    role: String,
    name: String,
    username: String,
    email: String,
    password_hash: String,
    city: String,
    registered_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            id: UserId::from_raw(self.id),
            role: parse_role(&self.role)?,
            name: ProfileText::from_db(self.name),
            user_name: UserName::from_db(self.username),
            email: Email::from_db(self.email),
            password: UserPassword::from_phc_string(self.password_hash)?,
            city: ProfileText::from_db(self.city),
            registered_at: self.registered_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: i64,
    user_id: i64,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> AuthResult<Session> {
        let refresh_token = RefreshToken::new(self.refresh_token)
            .ok_or_else(|| AuthError::Internal(format!("session {} has no token", self.id)))?;

        Ok(Session {
            id: SessionId::from_raw(self.id),
            user_id: UserId::from_raw(self.user_id),
            refresh_token,
            expires_at: self.expires_at,
        })
    }
}

fn parse_role(code: &str) -> AuthResult<UserRole> {
    UserRole::from_code(code)
        .ok_or_else(|| AuthError::Internal(format!("unknown role in database: {code}")))
}
