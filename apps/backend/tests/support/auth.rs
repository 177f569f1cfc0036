//! Token helpers for tests

use std::time::{Duration, SystemTime};

use dating_backend::auth::jwt::{sign_claims, unix_seconds};
use dating_backend::auth::{IdentityClaims, Provider, UserId};
use dating_backend::state::security_config::SecurityConfig;

fn claims_for(user_id: &str, email: &str, issued_at: SystemTime) -> IdentityClaims {
    let user_id = UserId::parse(user_id).expect("test user ids must be canonical");
    let provider = user_id.provider().unwrap_or(Provider::Google);
    IdentityClaims::new(user_id, provider, email.to_string(), unix_seconds(issued_at))
}

/// Token for `user_id` signed with the shared test secret.
pub fn mint_test_token(user_id: &str, email: &str) -> String {
    sign_claims(
        &claims_for(user_id, email, SystemTime::now()),
        &SecurityConfig::for_tests(),
    )
    .expect("should mint token successfully")
}

/// Full `Authorization` header value for `user_id`.
pub fn bearer_header(user_id: &str) -> String {
    format!("Bearer {}", mint_test_token(user_id, "user@example.com"))
}

/// Token whose expiry is one second before its issue time.
pub fn mint_expired_token(user_id: &str) -> String {
    let mut claims = claims_for(user_id, "user@example.com", SystemTime::now());
    claims.exp = claims.iat - 1;
    sign_claims(&claims, &SecurityConfig::for_tests()).expect("should mint expired token")
}

/// Token that was valid for seven days, starting eight days ago.
pub fn mint_stale_token(user_id: &str) -> String {
    let issued = SystemTime::now() - Duration::from_secs(8 * 24 * 60 * 60);
    sign_claims(
        &claims_for(user_id, "user@example.com", issued),
        &SecurityConfig::for_tests(),
    )
    .expect("should mint stale token")
}

/// Token signed with a secret the server does not know.
pub fn mint_foreign_token(user_id: &str) -> String {
    let foreign = SecurityConfig::new("some-other-service-secret").expect("valid secret");
    sign_claims(
        &claims_for(user_id, "user@example.com", SystemTime::now()),
        &foreign,
    )
    .expect("should mint foreign token")
}

/// Replace the final character with a different base64url character.
pub fn tamper_last_char(token: &str) -> String {
    let mut chars: Vec<char> = token.chars().collect();
    let last = chars.last_mut().expect("token is not empty");
    *last = if *last == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}
