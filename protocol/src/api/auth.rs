//! Authentication API DTOs
//!
//! This module contains data transfer objects for authentication-related
//! endpoints: login, registration, token refresh, logout, profile and
//! password management, plus the admin user-management views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub use crate::common::{Claims, Role, TokenPair};

// ============================================================================
// Login DTOs
// ============================================================================

/// Credentials login request for POST /auth/login/
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Login response: both tokens plus the user profile the backend attaches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    #[serde(default)]
    pub user: Option<UserAccount>,
}

// ============================================================================
// Registration DTOs
// ============================================================================

/// Registration request for POST /auth/register/
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub password2: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    #[serde(default)]
    pub phone: String,
}

/// Tokens nested under a `tokens` key, one of the two registration shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedTokens {
    pub access: String,
    pub refresh: String,
}

/// Registration response.
///
/// The backend has shipped two shapes for this endpoint: tokens nested under
/// a `tokens` key, or flattened at top level next to the user. Both
/// deserialize here; `into_parts` normalizes them to one internal form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub tokens: Option<NestedTokens>,
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub user: Option<UserAccount>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RegisterResponse {
    /// Normalize the two response shapes into a token pair and profile.
    /// Returns `None` when neither shape carries a complete pair.
    pub fn into_parts(self) -> Option<(TokenPair, Option<UserAccount>)> {
        let pair = match self.tokens {
            Some(nested) => TokenPair {
                access: nested.access,
                refresh: nested.refresh,
            },
            None => TokenPair {
                access: self.access?,
                refresh: self.refresh?,
            },
        };
        Some((pair, self.user))
    }
}

// ============================================================================
// Token Refresh / Logout DTOs
// ============================================================================

/// Refresh access token request for POST /auth/token/refresh/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Refresh response: only a new access token, the refresh token is untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Logout request for POST /auth/logout/ (server-side refresh revocation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

// ============================================================================
// Profile DTOs
// ============================================================================

/// User record as returned by the accounts endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// Partial profile update for PUT /auth/profile/update/
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[validate(email)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Profile update response wraps the fresh record with a status message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdateResponse {
    pub user: UserAccount,
    #[serde(default)]
    pub message: Option<String>,
}

/// Change password request for POST /auth/change-password/
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
    #[validate(must_match(other = "new_password"))]
    pub new_password2: String,
}

/// Plain `{"message": ...}` acknowledgements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// User Management DTOs (admin)
// ============================================================================

/// Partial user update for PATCH /auth/users/{id}/
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<&UserAccount> for UserUpdate {
    fn from(user: &UserAccount) -> Self {
        Self {
            username: Some(user.username.clone()),
            email: Some(user.email.clone()),
            first_name: Some(user.first_name.clone()),
            last_name: Some(user.last_name.clone()),
            role: Some(user.role),
            phone: Some(user.phone.clone()),
        }
    }
}

/// Response of POST /auth/users/{id}/verify/
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyUserResponse {
    #[serde(default)]
    pub message: String,
    pub user: UserAccount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_response_nested_shape() {
        let raw = serde_json::json!({
            "user": {"id": 7, "username": "tpo", "role": "ADMIN"},
            "message": "User registered successfully",
            "tokens": {"refresh": "r-1", "access": "a-1"}
        });
        let resp: RegisterResponse = serde_json::from_value(raw).unwrap();
        let (pair, user) = resp.into_parts().unwrap();
        assert_eq!(pair.access, "a-1");
        assert_eq!(pair.refresh, "r-1");
        assert_eq!(user.unwrap().username, "tpo");
    }

    #[test]
    fn register_response_flat_shape() {
        let raw = serde_json::json!({
            "access": "a-2",
            "refresh": "r-2",
            "user": {"id": 8, "username": "rep", "role": "COMPANY"}
        });
        let resp: RegisterResponse = serde_json::from_value(raw).unwrap();
        let (pair, _) = resp.into_parts().unwrap();
        assert_eq!(pair.access, "a-2");
        assert_eq!(pair.refresh, "r-2");
    }

    #[test]
    fn register_response_incomplete_pair() {
        let raw = serde_json::json!({"access": "only-half"});
        let resp: RegisterResponse = serde_json::from_value(raw).unwrap();
        assert!(resp.into_parts().is_none());
    }
}
