//! Error codes for the Ledgerly backend API.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses or in internal logs.

use core::fmt;

/// Centralized error codes for the Ledgerly backend API.
///
/// This enum ensures type safety and prevents the use of ad-hoc error codes.
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required (generic, caller-facing 401 code)
    Unauthorized,
    /// No session cookie and no Bearer token on the request
    UnauthorizedMissingToken,
    /// Token was present but structurally undecodable
    UnauthorizedMalformedToken,
    /// Token header declared an algorithm other than the configured one
    UnauthorizedBadAlgorithm,
    /// Token signature did not verify against the server secret
    UnauthorizedBadSignature,
    /// Token expiry is in the past
    UnauthorizedExpiredToken,
    /// Token not-before is in the future
    UnauthorizedPrematureToken,
    /// Unknown email or wrong password (deliberately merged)
    InvalidCredentials,

    // Request Validation
    /// Invalid email address
    InvalidEmail,
    /// Password does not meet the minimum requirements
    InvalidPassword,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// User not found
    UserNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Email already registered
    DuplicateEmail,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout (gateway timeout)
    DbTimeout,
    /// Password hashing could not run (entropy/worker-pool exhaustion)
    HashingFailure,
    /// Stored password hash is not in the expected encoding
    MalformedHash,
    /// Token could not be signed (secret unavailable)
    SigningFailure,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingToken => "UNAUTHORIZED_MISSING_TOKEN",
            Self::UnauthorizedMalformedToken => "UNAUTHORIZED_MALFORMED_TOKEN",
            Self::UnauthorizedBadAlgorithm => "UNAUTHORIZED_BAD_ALGORITHM",
            Self::UnauthorizedBadSignature => "UNAUTHORIZED_BAD_SIGNATURE",
            Self::UnauthorizedExpiredToken => "UNAUTHORIZED_EXPIRED_TOKEN",
            Self::UnauthorizedPrematureToken => "UNAUTHORIZED_PREMATURE_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::Conflict => "CONFLICT",
            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::HashingFailure => "HASHING_FAILURE",
            Self::MalformedHash => "MALFORMED_HASH",
            Self::SigningFailure => "SIGNING_FAILURE",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
