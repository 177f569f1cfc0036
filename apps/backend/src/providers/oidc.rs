//! ID-token verification for OpenID Connect providers (Google, Apple).
//!
//! Tokens are RS256-signed by the provider; the signing keys come from the
//! provider's JWKS endpoint and are cached for an hour.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use moka::future::Cache;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{Credential, IdentityProvider, VerifiedSubject};
use crate::auth::claims::Provider;
use crate::auth::error::AuthError;

const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const APPLE_JWKS_URL: &str = "https://appleid.apple.com/auth/keys";
const JWKS_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
pub struct OidcConfig {
    pub provider: Provider,
    pub jwks_url: String,
    /// Accepted `iss` values.
    pub issuers: Vec<String>,
    /// Accepted `aud` values (the app's OAuth client ids).
    pub audiences: Vec<String>,
}

impl OidcConfig {
    pub fn google(client_ids: Vec<String>) -> Self {
        Self {
            provider: Provider::Google,
            jwks_url: GOOGLE_JWKS_URL.to_string(),
            issuers: vec![
                "accounts.google.com".to_string(),
                "https://accounts.google.com".to_string(),
            ],
            audiences: client_ids,
        }
    }

    pub fn apple(client_ids: Vec<String>) -> Self {
        Self {
            provider: Provider::Apple,
            jwks_url: APPLE_JWKS_URL.to_string(),
            issuers: vec!["https://appleid.apple.com".to_string()],
            audiences: client_ids,
        }
    }
}

enum JwksSource {
    Remote {
        http: reqwest::Client,
        cache: Cache<String, Arc<JwkSet>>,
    },
    Static(Arc<JwkSet>),
}

/// Claims this verifier reads from a provider ID token.
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: Option<String>,
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<EmailVerified>,
}

/// Google sends a boolean, Apple a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmailVerified {
    Flag(bool),
    Text(String),
}

impl EmailVerified {
    fn is_false(&self) -> bool {
        match self {
            EmailVerified::Flag(flag) => !flag,
            EmailVerified::Text(text) => text.eq_ignore_ascii_case("false"),
        }
    }
}

pub struct OidcIdTokenVerifier {
    config: OidcConfig,
    keys: JwksSource,
}

impl OidcIdTokenVerifier {
    /// Verifier fetching keys over HTTP; `timeout` bounds each JWKS request.
    pub fn new(config: OidcConfig, timeout: Duration) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::ConfigurationError(format!("http client: {e}")))?;
        let cache = Cache::builder()
            .max_capacity(4)
            .time_to_live(JWKS_TTL)
            .build();
        Ok(Self {
            config,
            keys: JwksSource::Remote { http, cache },
        })
    }

    /// Verifier with a fixed key set and no network access.
    pub fn with_static_keys(config: OidcConfig, keys: JwkSet) -> Self {
        Self {
            config,
            keys: JwksSource::Static(Arc::new(keys)),
        }
    }

    async fn key_set(&self, refresh: bool) -> Result<Arc<JwkSet>, AuthError> {
        match &self.keys {
            JwksSource::Static(keys) => Ok(keys.clone()),
            JwksSource::Remote { http, cache } => {
                let url = self.config.jwks_url.clone();
                if refresh {
                    cache.invalidate(&url).await;
                }
                cache
                    .try_get_with(url.clone(), fetch_jwks(http, url))
                    .await
                    .map_err(|e: Arc<AuthError>| (*e).clone())
            }
        }
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let mut keys = self.key_set(false).await?;
        if keys.find(kid).is_none() {
            // Provider may have rotated keys since the last fetch.
            debug!(provider = %self.config.provider, kid, "unknown kid, refreshing JWKS");
            keys = self.key_set(true).await?;
        }
        let jwk = keys
            .find(kid)
            .ok_or_else(|| AuthError::provider(format!("no signing key for kid '{kid}'")))?;
        DecodingKey::from_jwk(jwk).map_err(|e| AuthError::provider(format!("unusable JWK: {e}")))
    }
}

async fn fetch_jwks(http: &reqwest::Client, url: String) -> Result<Arc<JwkSet>, AuthError> {
    let response = http
        .get(&url)
        .send()
        .await
        .map_err(|e| AuthError::provider(format!("JWKS fetch failed: {e}")))?;

    if !response.status().is_success() {
        return Err(AuthError::provider(format!(
            "JWKS endpoint returned status {}",
            response.status()
        )));
    }

    let keys: JwkSet = response
        .json()
        .await
        .map_err(|e| AuthError::provider(format!("invalid JWKS document: {e}")))?;
    info!(jwks_url = %url, key_count = keys.keys.len(), "fetched JWKS");
    Ok(Arc::new(keys))
}

fn subject_from_claims(claims: IdTokenClaims) -> Result<VerifiedSubject, AuthError> {
    let subject_id = claims
        .sub
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AuthError::provider("ID token has no subject"))?;
    let email = claims
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AuthError::provider("ID token has no email"))?;
    if claims.email_verified.as_ref().is_some_and(EmailVerified::is_false) {
        return Err(AuthError::provider("email is not verified"));
    }
    Ok(VerifiedSubject { subject_id, email })
}

#[async_trait]
impl IdentityProvider for OidcIdTokenVerifier {
    fn provider(&self) -> Provider {
        self.config.provider
    }

    async fn verify(&self, credential: Credential<'_>) -> Result<VerifiedSubject, AuthError> {
        let raw_token = credential.id_token(self.config.provider)?;
        let header = decode_header(raw_token)
            .map_err(|_| AuthError::provider("malformed ID token"))?;
        if header.alg != Algorithm::RS256 {
            warn!(provider = %self.config.provider, alg = ?header.alg, "rejected ID token algorithm");
            return Err(AuthError::provider("unexpected ID token algorithm"));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::provider("ID token has no key id"))?;

        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&self.config.issuers);
        validation.set_audience(&self.config.audiences);

        let data = decode::<IdTokenClaims>(raw_token, &key, &validation)
            .map_err(|e| AuthError::provider(format!("ID token rejected: {e}")))?;

        subject_from_claims(data.claims)
    }
}
