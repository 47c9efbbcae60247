//! Shared auth services
//!
//! The token codec and password hasher are built once from [`AuthConfig`]
//! and shared by every router that needs them.

use std::sync::Arc;

use platform::password::PasswordHasher;

use crate::application::config::AuthConfig;
use crate::application::token::AccessTokenCodec;
use crate::domain::value_object::user_password::UserPassword;
use crate::error::AuthResult;

#[derive(Clone)]
pub struct AuthServices {
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<AccessTokenCodec>,
    pub hasher: Arc<PasswordHasher>,
    /// Verified against when sign-in finds no such user.
    pub dummy_password: Arc<UserPassword>,
}

impl AuthServices {
    /// Fails on an empty token secret or invalid hash cost.
    pub fn from_config(config: AuthConfig) -> AuthResult<Self> {
        let tokens = AccessTokenCodec::new(config.token_secret.as_bytes())?;

        let mut hasher = PasswordHasher::new(config.password_pepper.clone());
        if let Some(cost) = config.password_hash_cost {
            hasher = hasher.with_params(cost.memory_kib, cost.iterations, cost.parallelism)?;
        }

        let dummy_password = UserPassword::placeholder(&hasher)?;

        Ok(Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            hasher: Arc::new(hasher),
            dummy_password: Arc::new(dummy_password),
        })
    }

    /// Fixed secret and the cheapest Argon2 cost.
    #[cfg(any(test, feature = "memory"))]
    pub fn testing() -> Self {
        use crate::application::config::HashCost;

        let mut config = AuthConfig::new("test-token-secret");
        config.password_hash_cost = Some(HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        });
        match Self::from_config(config) {
            Ok(services) => services,
            Err(e) => panic!("test services: {e}"),
        }
    }
}
