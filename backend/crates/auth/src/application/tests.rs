use std::sync::Arc;

use chrono::{Duration, Utc};

use super::*;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    refresh_token::RefreshToken, user_name::UserName, user_role::UserRole,
};
use crate::error::AuthError;
use crate::infra::memory::InMemoryAuthRepository;

fn setup() -> (Arc<InMemoryAuthRepository>, AuthServices) {
    (Arc::new(InMemoryAuthRepository::new()), AuthServices::testing())
}

fn sign_up_input(user_name: &str) -> SignUpInput {
    SignUpInput {
        name: "Alice".to_string(),
        user_name: user_name.to_string(),
        password: "secret1".to_string(),
        email: format!("{user_name}@example.com"),
        city: "Paris".to_string(),
    }
}

async fn signed_up(repo: &Arc<InMemoryAuthRepository>, services: &AuthServices) {
    SignUpUseCase::new(repo.clone(), services.hasher.clone())
        .execute(sign_up_input("alice"))
        .await
        .unwrap();
}

async fn sign_in(
    repo: &Arc<InMemoryAuthRepository>,
    services: &AuthServices,
    password: &str,
) -> Result<TokenPair, AuthError> {
    SignInUseCase::new(repo.clone(), repo.clone(), services.clone())
        .execute(SignInInput {
            user_name: "alice".to_string(),
            password: password.to_string(),
        })
        .await
}

// ============================================================================
// Sign Up
// ============================================================================

#[tokio::test]
async fn test_sign_up_stores_user_with_hashed_password() {
    let (repo, services) = setup();

    let output = SignUpUseCase::new(repo.clone(), services.hasher.clone())
        .execute(sign_up_input("alice"))
        .await
        .unwrap();

    let user = repo.find_by_id(output.user_id).await.unwrap().unwrap();
    assert_eq!(user.role, UserRole::User);
    assert_eq!(user.user_name.as_str(), "alice");
    assert_eq!(user.email.as_str(), "alice@example.com");
    assert!(user.password.as_phc_string().starts_with("$argon2id$"));
}

#[tokio::test]
async fn test_sign_up_duplicate_user_name() {
    let (repo, services) = setup();
    signed_up(&repo, &services).await;

    let result = SignUpUseCase::new(repo.clone(), services.hasher.clone())
        .execute(sign_up_input("alice"))
        .await;

    assert!(matches!(result, Err(AuthError::UserNameTaken)));
}

#[tokio::test]
async fn test_sign_up_rejects_invalid_fields() {
    let (repo, services) = setup();
    let use_case = SignUpUseCase::new(repo.clone(), services.hasher.clone());

    let mut input = sign_up_input("alice");
    input.email = "not-an-email".to_string();
    assert!(matches!(
        use_case.execute(input).await,
        Err(AuthError::Validation(_))
    ));

    let mut input = sign_up_input("alice");
    input.password = "123".to_string();
    assert!(matches!(
        use_case.execute(input).await,
        Err(AuthError::Validation(_))
    ));

    let mut input = sign_up_input("alice");
    input.city = "  ".to_string();
    assert!(matches!(
        use_case.execute(input).await,
        Err(AuthError::Validation(ref m)) if m == "city must not be empty"
    ));

    assert!(repo.list().await.unwrap().is_empty());
}

// ============================================================================
// Sign In
// ============================================================================

#[tokio::test]
async fn test_sign_in_issues_tokens() {
    let (repo, services) = setup();
    signed_up(&repo, &services).await;

    let pair = sign_in(&repo, &services, "secret1").await.unwrap();

    let access = services.tokens.verify(&pair.access_token).unwrap();
    assert_eq!(access.user_id, pair.user_id);
    assert_eq!(access.role, UserRole::User);
    assert_eq!(access.expires_at - access.issued_at, 30 * 60);

    let session = repo.find_session(&pair.refresh_token).await.unwrap().unwrap();
    assert_eq!(session.user_id, pair.user_id);
    let remaining = session.expires_at - Utc::now();
    assert!(remaining > Duration::days(29) && remaining <= Duration::days(30));
}

#[tokio::test]
async fn test_sign_in_failures_are_indistinguishable() {
    let (repo, services) = setup();
    signed_up(&repo, &services).await;

    let wrong_password = sign_in(&repo, &services, "secret2").await.unwrap_err();
    let unknown_user = SignInUseCase::new(repo.clone(), repo.clone(), services.clone())
        .execute(SignInInput {
            user_name: "bob".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    assert_eq!(repo.session_count().await, 0);
}

#[tokio::test]
async fn test_sign_in_unknown_user_still_hashes() {
    let repo = Arc::new(InMemoryAuthRepository::new());
    let mut config = AuthConfig::new("test-token-secret");
    config.password_hash_cost = Some(HashCost {
        memory_kib: 8192,
        iterations: 2,
        parallelism: 1,
    });
    let services = AuthServices::from_config(config).unwrap();
    signed_up(&repo, &services).await;

    let attempt = |user_name: &'static str| {
        let use_case = SignInUseCase::new(repo.clone(), repo.clone(), services.clone());
        async move {
            let started = std::time::Instant::now();
            let result = use_case
                .execute(SignInInput {
                    user_name: user_name.to_string(),
                    password: "secret2".to_string(),
                })
                .await;
            assert!(matches!(result, Err(AuthError::InvalidCredentials)));
            started.elapsed()
        }
    };

    let known = attempt("alice").await;
    let unknown = attempt("bob").await;
    assert!(
        unknown * 4 >= known,
        "unknown user took {unknown:?}, wrong password took {known:?}"
    );
}

#[tokio::test]
async fn test_sign_in_user_name_is_case_sensitive() {
    let (repo, services) = setup();
    signed_up(&repo, &services).await;

    let result = SignInUseCase::new(repo.clone(), repo.clone(), services.clone())
        .execute(SignInInput {
            user_name: "Alice".to_string(),
            password: "secret1".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_rotates_session() {
    let (repo, services) = setup();
    signed_up(&repo, &services).await;
    let first = sign_in(&repo, &services, "secret1").await.unwrap();

    let refresh = RefreshUseCase::new(repo.clone(), repo.clone(), services.clone());
    let second = refresh.execute(first.refresh_token.clone()).await.unwrap();

    assert_ne!(first.refresh_token, second.refresh_token);
    assert_eq!(second.user_id, first.user_id);
    assert!(services.tokens.verify(&second.access_token).is_ok());
    assert_eq!(repo.session_count().await, 1);

    let replay = refresh.execute(first.refresh_token).await;
    assert!(matches!(replay, Err(AuthError::SessionInvalid)));
}

#[tokio::test]
async fn test_refresh_picks_up_current_role() {
    let (repo, services) = setup();
    signed_up(&repo, &services).await;
    let pair = sign_in(&repo, &services, "secret1").await.unwrap();

    let changes = crate::domain::entity::user::UserChanges {
        role: Some(UserRole::Admin),
        ..Default::default()
    };
    assert!(repo.update(pair.user_id, &changes).await.unwrap());

    let refreshed = RefreshUseCase::new(repo.clone(), repo.clone(), services.clone())
        .execute(pair.refresh_token)
        .await
        .unwrap();

    let access = services.tokens.verify(&refreshed.access_token).unwrap();
    assert_eq!(access.role, UserRole::Admin);
}

#[tokio::test]
async fn test_refresh_unknown_token() {
    let (repo, services) = setup();

    let result = RefreshUseCase::new(repo.clone(), repo.clone(), services)
        .execute(RefreshToken::new("deadbeef").unwrap())
        .await;

    assert!(matches!(result, Err(AuthError::SessionInvalid)));
}

#[tokio::test]
async fn test_refresh_expired_session_is_deleted() {
    let (repo, services) = setup();
    signed_up(&repo, &services).await;
    let user = repo
        .find_by_user_name(&UserName::new("alice").unwrap())
        .await
        .unwrap()
        .unwrap();

    let token = RefreshToken::new("expired-token").unwrap();
    repo.insert_session(user.id, token.clone(), Utc::now() - Duration::seconds(1))
        .await;

    let result = RefreshUseCase::new(repo.clone(), repo.clone(), services)
        .execute(token.clone())
        .await;

    assert!(matches!(result, Err(AuthError::SessionExpired)));
    assert!(repo.find_session(&token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_refresh_keeps_old_session_when_create_fails() {
    let (repo, services) = setup();
    signed_up(&repo, &services).await;
    let pair = sign_in(&repo, &services, "secret1").await.unwrap();

    repo.fail_next_session_create();
    let refresh = RefreshUseCase::new(repo.clone(), repo.clone(), services.clone());
    let failed = refresh.execute(pair.refresh_token.clone()).await;
    assert!(matches!(failed, Err(AuthError::Database(_))));

    assert!(refresh.execute(pair.refresh_token).await.is_ok());
}

#[tokio::test]
async fn test_refresh_after_user_deleted() {
    let (repo, services) = setup();
    signed_up(&repo, &services).await;
    let pair = sign_in(&repo, &services, "secret1").await.unwrap();

    assert!(repo.delete(pair.user_id).await.unwrap());

    let result = RefreshUseCase::new(repo.clone(), repo.clone(), services)
        .execute(pair.refresh_token)
        .await;
    assert!(matches!(result, Err(AuthError::SessionInvalid)));
}

// ============================================================================
// Admin Bootstrap
// ============================================================================

#[tokio::test]
async fn test_ensure_admin_runs_once() {
    let (repo, services) = setup();
    let use_case = EnsureAdminUseCase::new(repo.clone(), services.hasher.clone());
    let seed = || AdminSeed {
        user_name: "root".to_string(),
        password: "root-password".to_string(),
        email: "admin@example.com".to_string(),
    };

    let created = use_case.execute(seed()).await.unwrap();
    let admin_id = created.expect("admin should be created");
    assert_eq!(repo.find_role(admin_id).await.unwrap(), Some(UserRole::Admin));

    assert!(use_case.execute(seed()).await.unwrap().is_none());
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_purge_expired_sessions() {
    let (repo, services) = setup();
    signed_up(&repo, &services).await;
    let live = sign_in(&repo, &services, "secret1").await.unwrap();

    repo.insert_session(
        live.user_id,
        RefreshToken::new("stale").unwrap(),
        Utc::now() - Duration::days(1),
    )
    .await;

    assert_eq!(repo.purge_expired().await.unwrap(), 1);
    assert_eq!(repo.session_count().await, 1);
    assert!(repo.find_session(&live.refresh_token).await.unwrap().is_some());
}
