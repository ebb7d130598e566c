//! Session decoding and in-memory session state
//!
//! Access tokens are decoded without signature verification: the backend is
//! the authority and re-validates every request, so the decoded claims only
//! drive what the client displays and which commands it offers. The expiry
//! check here is advisory for the same reason.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};

use placetrack_protocol::{Claims, Role, UserAccount};

use crate::error::{Result, TrackError};

/// Decode the payload segment of a compact signed token.
///
/// Fails with a malformed-token error when the token has no payload segment
/// or the segment is not URL-safe base64 JSON.
pub fn decode_claims(token: &str) -> Result<Claims> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| TrackError::malformed_token("token has no payload segment"))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| TrackError::malformed_token(format!("payload is not base64url: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| TrackError::malformed_token(format!("payload is not claims JSON: {}", e)))
}

/// The signed-in user: decoded claims plus whatever profile payload the
/// backend attached to the login/refresh response.
#[derive(Debug, Clone)]
pub struct Session {
    claims: Claims,
    profile: Option<UserAccount>,
}

impl Session {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            claims,
            profile: None,
        }
    }

    pub fn with_profile(claims: Claims, profile: Option<UserAccount>) -> Self {
        Self { claims, profile }
    }

    /// Merge a fresh profile payload. The role stays whatever the most
    /// recently decoded access token says; profile data never overrides it.
    pub fn merge_profile(&mut self, profile: UserAccount) {
        self.profile = Some(profile);
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn profile(&self) -> Option<&UserAccount> {
        self.profile.as_ref()
    }

    pub fn user_id(&self) -> i64 {
        self.claims.user_id
    }

    pub fn username(&self) -> &str {
        if !self.claims.username.is_empty() {
            &self.claims.username
        } else if let Some(profile) = &self.profile {
            &profile.username
        } else {
            ""
        }
    }

    pub fn email(&self) -> &str {
        if !self.claims.email.is_empty() {
            &self.claims.email
        } else if let Some(profile) = &self.profile {
            &profile.email
        } else {
            ""
        }
    }

    /// Role from the latest decoded access token.
    pub fn role(&self) -> Role {
        self.claims.role
    }

    // Role flags are computed on every call rather than stored, so a
    // role-changing profile update can never leave a stale flag behind.

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }

    pub fn is_student(&self) -> bool {
        self.role() == Role::Student
    }

    pub fn is_company_rep(&self) -> bool {
        self.role() == Role::Company
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.claims.exp, 0)
    }

    /// Advisory staleness check against a millisecond wall clock.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.claims.exp.saturating_mul(1000) <= now_ms
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use super::*;
    use serde_json::json;

    /// Build an unsigned compact token around the given claims JSON.
    pub fn encode(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{}.{}.signature", header, payload)
    }

    pub fn token_with_role(role: &str, exp: i64) -> String {
        encode(&json!({
            "user_id": 42,
            "username": "asha.v",
            "email": "asha@example.edu",
            "role": role,
            "is_verified": true,
            "exp": exp,
            "iat": exp - 3600,
        }))
    }
}
