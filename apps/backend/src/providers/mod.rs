//! External identity providers.
//!
//! A provider turns a raw credential (Google ID token, Apple identity token,
//! email and password) into a verified subject. The token issuer only consumes
//! the verified result.

pub mod email;
pub mod oidc;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::claims::Provider;
use crate::auth::error::AuthError;

pub use email::{password_problems, EmailPasswordProvider, RegisterError};
pub use oidc::{OidcConfig, OidcIdTokenVerifier};

/// What a client presents at sign-in.
#[derive(Clone, Copy)]
pub enum Credential<'a> {
    /// Token minted by a client SDK.
    IdToken(&'a str),
    Password { email: &'a str, password: &'a str },
}

impl<'a> Credential<'a> {
    /// The ID token, or a verification failure naming what `provider` expects.
    pub fn id_token(self, provider: Provider) -> Result<&'a str, AuthError> {
        match self {
            Credential::IdToken(token) => Ok(token),
            Credential::Password { .. } => {
                Err(AuthError::provider(format!("{provider} sign-in expects an ID token")))
            }
        }
    }
}

impl std::fmt::Debug for Credential<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::IdToken(_) => f.write_str("IdToken([redacted])"),
            Credential::Password { email, .. } => f
                .debug_struct("Password")
                .field("email", email)
                .field("password", &"[redacted]")
                .finish(),
        }
    }
}

/// Provider-verified identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSubject {
    pub subject_id: String,
    pub email: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn provider(&self) -> Provider;

    /// Verify a credential presented at sign-in.
    ///
    /// Every failure is reported as `AuthError::ProviderVerificationFailed`.
    async fn verify(&self, credential: Credential<'_>) -> Result<VerifiedSubject, AuthError>;
}

/// Enabled verifiers, one per provider.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    verifiers: HashMap<Provider, Arc<dyn IdentityProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, verifier: Arc<dyn IdentityProvider>) -> Self {
        self.register(verifier);
        self
    }

    /// Register a verifier, replacing any previous one for the same provider.
    pub fn register(&mut self, verifier: Arc<dyn IdentityProvider>) {
        self.verifiers.insert(verifier.provider(), verifier);
    }

    pub fn is_enabled(&self, provider: Provider) -> bool {
        self.verifiers.contains_key(&provider)
    }

    pub fn get(&self, provider: Provider) -> Result<Arc<dyn IdentityProvider>, AuthError> {
        self.verifiers
            .get(&provider)
            .cloned()
            .ok_or_else(|| AuthError::provider(format!("{provider} sign-in is not enabled")))
    }

    pub fn enabled(&self) -> Vec<Provider> {
        let mut providers: Vec<Provider> = self.verifiers.keys().copied().collect();
        providers.sort_by_key(|p| p.as_str());
        providers
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("enabled", &self.enabled())
            .finish()
    }
}
