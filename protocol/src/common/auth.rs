//! Authentication-related common types

use serde::{Deserialize, Serialize};

use crate::common::role::Role;

/// Decoded payload of an access token.
///
/// The client decodes these without verifying the signature: the backend is
/// the authority and re-validates every call, so decoded claims are a
/// display hint, never a security boundary. Fields the backend omits fall
/// back to defaults instead of failing the decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Numeric user id injected by the backend's token serializer.
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_verified: bool,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
    /// Issued at time (Unix timestamp, seconds)
    #[serde(default)]
    pub iat: i64,
}

/// The two opaque signed credentials persisted between runs.
///
/// The access token is short-lived and carries the claims above; the refresh
/// token is longer-lived and exchanged for a fresh access token. Both are
/// cleared together on logout or an irrecoverable refresh failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}
