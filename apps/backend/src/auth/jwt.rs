//! HS256 signing and verification of backend identity tokens.
//!
//! Verification checks the signature before anything else and applies `exp`
//! with no leeway. Any decode failure other than expiry is `InvalidSignature`.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Header, Validation};

use crate::auth::claims::IdentityClaims;
use crate::auth::error::AuthError;
use crate::state::security_config::SecurityConfig;

/// Seconds since the epoch for `now`.
pub fn unix_seconds(now: SystemTime) -> i64 {
    now.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Sign claims into a compact HS256 JWT.
pub fn sign_claims(claims: &IdentityClaims, security: &SecurityConfig) -> Result<String, AuthError> {
    encode(
        &Header::new(security.algorithm),
        claims,
        &security.encoding_key(),
    )
    .map_err(|e| AuthError::ConfigurationError(format!("failed to sign token: {e}")))
}

/// Verify a token and return its claims unchanged.
///
/// The signature is checked first; only a correctly signed token can be
/// reported as expired. Expiry is strict (`now < exp`) with no leeway.
///
/// Errors:
/// - bad signature, wrong algorithm, or any parse failure → `AuthError::InvalidSignature`
/// - `now >= exp` → `AuthError::Expired`
pub fn verify_token(
    token: &str,
    security: &SecurityConfig,
    now: SystemTime,
) -> Result<IdentityClaims, AuthError> {
    // Expiry is compared against the caller's clock below, so the library
    // check is disabled but the claim stays mandatory.
    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    let claims = decode::<IdentityClaims>(token, &security.decoding_key(), &validation)
        .map(|data| data.claims)
        // Header/payload corruption, algorithm mismatch and missing claims all
        // count as a bad signature.
        .map_err(|_| AuthError::InvalidSignature)?;

    if claims.is_expired_at(unix_seconds(now)) {
        return Err(AuthError::Expired);
    }

    Ok(claims)
}
