//! Error codes for the backend API.
//!
//! Every code that can appear in an HTTP error body is defined here. Add new
//! codes here; never pass ad-hoc strings as error codes.
//!
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the `code` field clients
//! branch on, so renaming one is a breaking change for the mobile app.

use core::fmt;

/// Centralized error codes shared by the auth, profile and chat services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// Authorization header absent or not a `Bearer` credential
    MalformedHeader,
    /// `Bearer ` prefix present but no token after it
    MissingToken,
    /// Signature mismatch or structurally corrupt token
    InvalidSignature,
    /// Token is past its `exp`
    TokenExpired,
    /// The external identity provider rejected the credential
    ProviderVerificationFailed,

    // Authorization
    /// Authenticated user does not own the target resource
    Forbidden,
    /// A two-party action names the actor as its own counterparty
    InvalidSelfReference,

    // Request validation
    /// A required field is absent or empty
    MissingField,
    /// Field-level validation failure
    ValidationError,
    /// Email failed the format or domain checks
    InvalidEmail,
    /// Identifier does not follow the `<provider>_<subject>` grammar
    InvalidUserId,
    /// Body could not be parsed
    BadRequest,

    // Resource state
    /// User record does not exist
    UserNotFound,
    /// Profile does not exist
    ProfileNotFound,
    /// Profile already exists for this user
    ProfileExists,
    /// Generic not found
    NotFound,
    /// Generic conflict
    Conflict,

    // System
    /// User store or another persistence collaborator failed (retryable)
    PersistenceError,
    /// Server is misconfigured
    ConfigurationError,
    /// Unexpected internal failure
    InternalError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedHeader => "MALFORMED_HEADER",
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::ProviderVerificationFailed => "PROVIDER_VERIFICATION_FAILED",

            Self::Forbidden => "FORBIDDEN",
            Self::InvalidSelfReference => "INVALID_SELF_REFERENCE",

            Self::MissingField => "MISSING_FIELD",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidUserId => "INVALID_USER_ID",
            Self::BadRequest => "BAD_REQUEST",

            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::ProfileExists => "PROFILE_EXISTS",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",

            Self::PersistenceError => "PERSISTENCE_ERROR",
            Self::ConfigurationError => "CONFIGURATION_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Every code, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        Self::MalformedHeader,
        Self::MissingToken,
        Self::InvalidSignature,
        Self::TokenExpired,
        Self::ProviderVerificationFailed,
        Self::Forbidden,
        Self::InvalidSelfReference,
        Self::MissingField,
        Self::ValidationError,
        Self::InvalidEmail,
        Self::InvalidUserId,
        Self::BadRequest,
        Self::UserNotFound,
        Self::ProfileNotFound,
        Self::ProfileExists,
        Self::NotFound,
        Self::Conflict,
        Self::PersistenceError,
        Self::ConfigurationError,
        Self::InternalError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
