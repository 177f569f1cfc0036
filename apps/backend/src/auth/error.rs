//! Failure taxonomy of the token and authorization core.
//!
//! These errors are framework-agnostic; `crate::error::AppError` maps each kind
//! onto an HTTP status and a stable [`ErrorCode`].

use thiserror::Error;

use crate::errors::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Authorization header missing, not UTF-8, or not a `Bearer ` credential.
    #[error("authorization header is missing or not a Bearer credential")]
    MalformedHeader,
    /// `Bearer ` prefix present with nothing after it.
    #[error("bearer token is empty")]
    MissingToken,
    /// Signature mismatch or a token that cannot be parsed at all.
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Signature is fine but `now >= exp`.
    #[error("token has expired")]
    Expired,
    /// The identity provider rejected, or could not check, the credential.
    #[error("identity provider verification failed: {0}")]
    ProviderVerificationFailed(String),
    /// The user store failed or timed out.
    #[error("user store failure: {0}")]
    PersistenceError(String),
    /// Actor field of a self-scoped route names someone else.
    #[error("{0}")]
    Forbidden(String),
    /// Two-party action where actor and counterparty are the same user.
    #[error("{0}")]
    InvalidSelfReference(String),
    /// The route's policy names an id field the request does not carry.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// An id field that does not follow the `<provider>_<subject>` grammar.
    #[error("Invalid user ID format")]
    InvalidUserId(&'static str),
    /// Signing material is absent or unusable.
    #[error("configuration error: {0}")]
    ConfigurationError(String),
}

impl AuthError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AuthError::MalformedHeader => ErrorCode::MalformedHeader,
            AuthError::MissingToken => ErrorCode::MissingToken,
            AuthError::InvalidSignature => ErrorCode::InvalidSignature,
            AuthError::Expired => ErrorCode::TokenExpired,
            AuthError::ProviderVerificationFailed(_) => ErrorCode::ProviderVerificationFailed,
            AuthError::PersistenceError(_) => ErrorCode::PersistenceError,
            AuthError::Forbidden(_) => ErrorCode::Forbidden,
            AuthError::InvalidSelfReference(_) => ErrorCode::InvalidSelfReference,
            AuthError::MissingField(_) => ErrorCode::MissingField,
            AuthError::InvalidUserId(_) => ErrorCode::InvalidUserId,
            AuthError::ConfigurationError(_) => ErrorCode::ConfigurationError,
        }
    }

    /// True for the kinds answered with 401.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedHeader
                | AuthError::MissingToken
                | AuthError::InvalidSignature
                | AuthError::Expired
                | AuthError::ProviderVerificationFailed(_)
        )
    }

    pub fn provider(detail: impl Into<String>) -> Self {
        AuthError::ProviderVerificationFailed(detail.into())
    }

    pub fn persistence(detail: impl Into<String>) -> Self {
        AuthError::PersistenceError(detail.into())
    }
}
