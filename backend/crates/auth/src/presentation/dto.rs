//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::value_object::UserId;

// ============================================================================
// Sign Up
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub city: String,
}

/// Also returned by admin user creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: UserId,
}

// ============================================================================
// Sign In / Refresh
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

/// The refresh token travels in the cookie, never in the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_response_is_camel_case() {
        let json = serde_json::to_value(AccessTokenResponse {
            access_token: "abc".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "accessToken": "abc" }));
    }

    #[test]
    fn test_created_response_id_is_a_number() {
        let json = serde_json::to_value(CreatedResponse {
            id: UserId::from_raw(7),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "id": 7 }));
    }
}
