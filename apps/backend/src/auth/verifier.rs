//! Stateless verification of backend-issued bearer tokens.

use std::time::SystemTime;

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use crate::auth::claims::IdentityClaims;
use crate::auth::error::AuthError;
use crate::auth::jwt::verify_token;
use crate::state::security_config::SecurityConfig;

const BEARER_PREFIX: &str = "Bearer ";

/// Split the token out of an `Authorization` header value.
///
/// - header absent, not UTF-8, or without the case-sensitive `Bearer ` prefix → `MalformedHeader`
/// - `Bearer` followed by nothing (or only whitespace) → `MissingToken`
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::MalformedHeader)?;

    // Some clients strip the trailing space of an empty "Bearer " credential.
    if value.trim_end() == BEARER_PREFIX.trim_end() {
        return Err(AuthError::MissingToken);
    }

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Token verifier bound to one signing configuration.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    security: SecurityConfig,
}

impl TokenVerifier {
    pub fn new(security: SecurityConfig) -> Self {
        Self { security }
    }

    /// Verify a raw token string at an explicit instant.
    pub fn verify_at(&self, token: &str, now: SystemTime) -> Result<IdentityClaims, AuthError> {
        verify_token(token, &self.security, now)
    }

    pub fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        self.verify_at(token, SystemTime::now())
    }

    /// Full pipeline for an incoming request: header parsing, signature, expiry.
    pub fn verify_headers(&self, headers: &HeaderMap) -> Result<IdentityClaims, AuthError> {
        let raw = match headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedHeader)?),
            None => None,
        };
        let token = parse_bearer(raw)?;
        self.verify(token)
    }
}
