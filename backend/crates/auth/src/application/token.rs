//! Access Token Codec
//!
//! HMAC-signed JWTs carrying `{sub, role, iat, exp}`. `sub` is the user ID as
//! a decimal string.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Identity recovered from a valid access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedAccess {
    pub user_id: UserId,
    pub role: UserRole,
    pub issued_at: i64,
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl AccessTokenCodec {
    pub fn new(secret: &[u8]) -> AuthResult<Self> {
        if secret.is_empty() {
            return Err(AuthError::Config(
                "token secret must not be empty".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // HMAC family only: rejects `none` and asymmetric algorithms.
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Sign a token for `user_id` valid for `ttl` from now (HS256).
    pub fn issue(&self, ttl: Duration, user_id: UserId, role: UserRole) -> AuthResult<String> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs())
            .map_err(|_| AuthError::TokenSigning("token ttl out of range".to_string()))?;
        let claims = AccessClaims {
            sub: user_id.to_string(),
            role: role.code().to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenSigning(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> AuthResult<VerifiedAccess> {
        let data = decode::<AccessClaims>(token, &self.decoding, &self.validation).map_err(
            |e| {
                let reason = match e.kind() {
                    JwtErrorKind::ExpiredSignature => "token expired".to_string(),
                    JwtErrorKind::InvalidAlgorithm | JwtErrorKind::InvalidAlgorithmName => {
                        "unexpected signing method".to_string()
                    }
                    JwtErrorKind::InvalidSignature => "invalid token signature".to_string(),
                    JwtErrorKind::MissingRequiredClaim(claim) => {
                        format!("token is missing claim: {claim}")
                    }
                    _ => "invalid token".to_string(),
                };
                AuthError::InvalidToken(reason)
            },
        )?;

        let claims = data.claims;
        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AuthError::InvalidToken("invalid token subject".to_string()))?;
        let role = UserRole::from_code(&claims.role)
            .ok_or_else(|| AuthError::InvalidToken("invalid token role".to_string()))?;

        Ok(VerifiedAccess {
            user_id,
            role,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}
