//! Error codes attached to log events.
//!
//! Clients only ever see `{"message": ...}`; the code travels in the
//! `error_code` tracing field so failures can be grouped in log search.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
//! assert_eq!(ErrorCode::ValidationError.code(), 1001);
//! ```

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request body or query failed validation
    ValidationError,

    /// Invalid UUID in a path segment
    InvalidUuid,

    /// Request body is not the expected JSON
    InvalidJson,

    /// Query string could not be deserialized
    InvalidQuery,

    /// Requested resource was not found
    NotFound,

    /// Credentials or token missing
    Unauthorized,

    /// Token valid but role not allowed
    Forbidden,

    /// Business rule rejected the request
    BadRequest,

    // Server errors (1500-1999)
    InternalError,

    ServiceUnavailable,

    // Database errors (2000-2999)
    DatabaseError,

    DatabaseConnection,

    DatabaseNotFound,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::InvalidJson => "INVALID_JSON",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::BadRequest => "BAD_REQUEST",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseConnection => "DATABASE_CONNECTION",
            Self::DatabaseNotFound => "DATABASE_NOT_FOUND",
        }
    }

    /// Integer code used in the `error_code` log field.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::InvalidJson => 1003,
            Self::InvalidQuery => 1004,
            Self::NotFound => 1005,
            Self::Unauthorized => 1006,
            Self::Forbidden => 1007,
            Self::BadRequest => 1008,
            Self::InternalError => 1500,
            Self::ServiceUnavailable => 1501,
            Self::DatabaseError => 2001,
            Self::DatabaseConnection => 2002,
            Self::DatabaseNotFound => 2003,
        }
    }

    /// Message sent to clients when the error carries none of its own.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::InvalidJson => "Invalid JSON body",
            Self::InvalidQuery => "Invalid query parameters",
            Self::NotFound => "The requested resource was not found",
            Self::Unauthorized => "Access denied",
            Self::Forbidden => "Forbidden",
            Self::BadRequest => "Bad request",
            Self::InternalError
            | Self::DatabaseError
            | Self::DatabaseConnection
            | Self::DatabaseNotFound => "An unexpected error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.code() >= 1500
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
