//! Unified error handling for the placetrack CLI and SDK
//!
//! This module provides:
//! - Unique error codes for debugging and documentation
//! - Structured error information with context
//! - Convenient constructor methods
//! - Automatic conversions from common error types

use std::fmt;
use thiserror::Error;

/// Unified Result type for all placetrack operations
pub type Result<T> = std::result::Result<T, TrackError>;

/// Error codes for placetrack operations
///
/// Each error has a unique code in the format `PXXX` where:
/// - P1XX: Authentication and authorization errors
/// - P2XX: Network and API errors
/// - P3XX: File and I/O errors
/// - P4XX: Configuration errors
/// - P5XX: Validation and input errors
/// - P6XX: Resource errors
/// - P8XX: UI and interaction errors
/// - P9XX: Internal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Authentication (P1XX)
    /// P101: Authentication failed
    AuthenticationFailed,
    /// P102: Authorization denied
    AuthorizationDenied,
    /// P103: Session expired
    SessionExpired,
    /// P104: Malformed token
    MalformedToken,
    /// P105: Not logged in
    NotLoggedIn,

    // Network (P2XX)
    /// P201: HTTP request failed
    HttpError,
    /// P202: Connection timeout
    ConnectionTimeout,
    /// P203: API returned error response
    ApiError,
    /// P204: Invalid API response format
    InvalidResponse,

    // File/IO (P3XX)
    /// P301: File not found
    FileNotFound,
    /// P302: File read/write error
    IoError,

    // Configuration (P4XX)
    /// P401: Configuration error
    ConfigError,

    // Validation (P5XX)
    /// P501: Invalid input
    InvalidInput,
    /// P502: Validation failed
    ValidationFailed,

    // Resource (P6XX)
    /// P601: Resource not found
    ResourceNotFound,

    // UI (P8XX)
    /// P801: User cancelled
    UserCancelled,

    // Internal (P9XX)
    /// P901: Internal error
    InternalError,
    /// P902: Serialization error
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::AuthenticationFailed => 101,
            ErrorCode::AuthorizationDenied => 102,
            ErrorCode::SessionExpired => 103,
            ErrorCode::MalformedToken => 104,
            ErrorCode::NotLoggedIn => 105,

            ErrorCode::HttpError => 201,
            ErrorCode::ConnectionTimeout => 202,
            ErrorCode::ApiError => 203,
            ErrorCode::InvalidResponse => 204,

            ErrorCode::FileNotFound => 301,
            ErrorCode::IoError => 302,

            ErrorCode::ConfigError => 401,

            ErrorCode::InvalidInput => 501,
            ErrorCode::ValidationFailed => 502,

            ErrorCode::ResourceNotFound => 601,

            ErrorCode::UserCancelled => 801,

            ErrorCode::InternalError => 901,
            ErrorCode::SerializationError => 902,
        }
    }

    /// Get the string code (e.g., "P101")
    pub fn as_str(&self) -> String {
        format!("P{}", self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.code())
    }
}

/// Main error type for all placetrack operations
#[derive(Error, Debug)]
pub enum TrackError {
    /// Authentication failed (bad credentials, missing or rejected token)
    #[error("[{code}] Authentication failed: {message}")]
    Authentication { code: ErrorCode, message: String },

    /// Authorization denied (valid session, insufficient role)
    #[error("[{code}] Access denied: {message}")]
    Authorization { code: ErrorCode, message: String },

    /// Session torn down after an irrecoverable refresh failure
    #[error("[{code}] Session expired, please log in again")]
    SessionExpired { code: ErrorCode },

    /// Network/transport failure
    #[error("[{code}] Network error: {message}")]
    Network {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The API answered with a non-success status
    #[error("[{code}] API error ({status}): {message}")]
    Api {
        code: ErrorCode,
        status: u16,
        message: String,
    },

    /// Backend rejected a payload; message carries the field errors
    #[error("[{code}] Validation failed: {message}")]
    Validation { code: ErrorCode, message: String },

    /// IO failure with context
    #[error("[{code}] {context}: {message}")]
    Io {
        code: ErrorCode,
        context: String,
        message: String,
    },

    /// Configuration loading/saving failure
    #[error("[{code}] Configuration error: {message}")]
    Config { code: ErrorCode, message: String },

    /// Locally rejected input
    #[error("[{code}] Invalid input: {message}")]
    InvalidInput { code: ErrorCode, message: String },

    /// Mutation target missing on the backend
    #[error("[{code}] Not found: {resource}")]
    NotFound { code: ErrorCode, resource: String },

    /// Interactive prompt dismissed
    #[error("[{code}] Cancelled by user")]
    UserCancelled { code: ErrorCode },

    /// Internal error
    #[error("[{code}] Internal error: {message}")]
    Internal { code: ErrorCode, message: String },

    /// Serialization error
    #[error("[{code}] Serialization error: {message}")]
    Serialization {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

// ==================== Constructor Methods ====================

impl TrackError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            code: ErrorCode::AuthenticationFailed,
            message: message.into(),
        }
    }

    pub fn not_logged_in() -> Self {
        Self::Authentication {
            code: ErrorCode::NotLoggedIn,
            message: "not logged in".to_string(),
        }
    }

    pub fn malformed_token(message: impl Into<String>) -> Self {
        Self::Authentication {
            code: ErrorCode::MalformedToken,
            message: message.into(),
        }
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            code: ErrorCode::AuthorizationDenied,
            message: message.into(),
        }
    }

    pub fn session_expired() -> Self {
        Self::SessionExpired {
            code: ErrorCode::SessionExpired,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            code: ErrorCode::HttpError,
            message: message.into(),
            source: None,
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            code: ErrorCode::ApiError,
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::Api {
            code: ErrorCode::InvalidResponse,
            status: 0,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
        }
    }

    pub fn io(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            code: ErrorCode::IoError,
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::Io {
            code: ErrorCode::FileNotFound,
            context: "File not found".to_string(),
            message: path.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::ConfigError,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: ErrorCode::InvalidInput,
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            code: ErrorCode::ResourceNotFound,
            resource: resource.into(),
        }
    }

    pub fn user_cancelled() -> Self {
        Self::UserCancelled {
            code: ErrorCode::UserCancelled,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::InternalError,
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: message.into(),
            source: None,
        }
    }

    // --- Utility Methods ---

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Authentication { code, .. } => *code,
            Self::Authorization { code, .. } => *code,
            Self::SessionExpired { code } => *code,
            Self::Network { code, .. } => *code,
            Self::Api { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::Io { code, .. } => *code,
            Self::Config { code, .. } => *code,
            Self::InvalidInput { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::UserCancelled { code } => *code,
            Self::Internal { code, .. } => *code,
            Self::Serialization { code, .. } => *code,
        }
    }

    /// Check if this is an authentication or authorization error
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::Authorization { .. } | Self::SessionExpired { .. }
        )
    }

    /// Check if this is a retryable transport-level error
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. }
                | Self::Api { status: 503, .. }
                | Self::Api { status: 429, .. }
        )
    }
}

// ==================== From Implementations ====================

impl From<std::io::Error> for TrackError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(err.to_string()),
            _ => Self::io("IO operation", err.to_string()),
        }
    }
}

impl From<reqwest::Error> for TrackError {
    fn from(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            ErrorCode::ConnectionTimeout
        } else {
            ErrorCode::HttpError
        };
        Self::Network {
            code,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for TrackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<config::ConfigError> for TrackError {
    fn from(err: config::ConfigError) -> Self {
        Self::config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for TrackError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorCode::AuthenticationFailed.code(), 101);
        assert_eq!(ErrorCode::HttpError.code(), 201);
        assert_eq!(ErrorCode::FileNotFound.code(), 301);
        assert_eq!(ErrorCode::ConfigError.code(), 401);
    }

    #[test]
    fn test_error_code_string() {
        assert_eq!(ErrorCode::AuthenticationFailed.as_str(), "P101");
        assert_eq!(ErrorCode::ResourceNotFound.as_str(), "P601");
    }

    #[test]
    fn test_error_display() {
        let err = TrackError::authentication("Invalid credentials");
        assert!(err.to_string().contains("P101"));
        assert!(err.to_string().contains("Invalid credentials"));
    }

    #[test]
    fn test_error_is_retryable() {
        assert!(TrackError::network("connection reset").is_retryable());
        assert!(TrackError::api(503, "unavailable").is_retryable());
        assert!(!TrackError::authentication("failed").is_retryable());
    }

    #[test]
    fn test_auth_error_classification() {
        assert!(TrackError::session_expired().is_auth_error());
        assert!(TrackError::authorization("role").is_auth_error());
        assert!(!TrackError::api(404, "missing").is_auth_error());
    }
}
