use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use crate::auth::error::AuthError;

/// Immutable signing configuration shared by the issuer and the verifier.
///
/// Built once at startup (or per test) and passed in explicitly; nothing in the
/// token core reads the secret from ambient state.
#[derive(Clone)]
pub struct SecurityConfig {
    jwt_secret: Vec<u8>,
    /// JWT algorithm (HS256)
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    /// Create a SecurityConfig from the shared HMAC secret.
    ///
    /// An empty secret is a configuration error: the service must refuse to
    /// start rather than sign with a guessable key.
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Result<Self, AuthError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.iter().all(u8::is_ascii_whitespace) {
            return Err(AuthError::ConfigurationError(
                "JWT secret must not be empty".to_string(),
            ));
        }
        Ok(Self {
            jwt_secret,
            algorithm: Algorithm::HS256,
        })
    }

    pub(crate) fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.jwt_secret)
    }

    pub(crate) fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.jwt_secret)
    }

    /// Fixed secret for tests that need deterministic tokens.
    pub fn for_tests() -> Self {
        Self {
            jwt_secret: b"test_secret_key_for_testing_purposes_only".to_vec(),
            algorithm: Algorithm::HS256,
        }
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
