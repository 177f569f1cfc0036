//! Email and password accounts.
//!
//! Registration stores an Argon2id hash under the normalized address together
//! with a random subject id. Sign-in checks the password and yields that
//! subject, so the issuer mints `email_<subject>` ids like any other provider.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{Credential, IdentityProvider, VerifiedSubject};
use crate::auth::claims::Provider;
use crate::auth::email::{validate_email, EmailError};
use crate::auth::error::AuthError;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};
use crate::repos::{CredentialStore, PasswordCredential};

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_PASSWORD_CHARS: usize = 128;

/// Same answer for an unknown address and a wrong password.
const REJECTED: &str = "invalid email or password";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegisterError {
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),
    #[error("{}", .0.join("; "))]
    WeakPassword(Vec<&'static str>),
    #[error(transparent)]
    Store(#[from] DomainError),
}

/// Every rule `password` breaks, in a fixed order. Empty means acceptable.
pub fn password_problems(password: &str) -> Vec<&'static str> {
    let chars = password.chars().count();
    let mut problems = Vec::new();
    if chars < MIN_PASSWORD_CHARS {
        problems.push("Password must be at least 8 characters");
    }
    if chars > MAX_PASSWORD_CHARS {
        problems.push("Password must be at most 128 characters");
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        problems.push("Password must contain at least one letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        problems.push("Password must contain at least one number");
    }
    problems
}

/// Lowest Argon2 cost the crate accepts. Test suites only.
pub fn test_params() -> Params {
    Params::new(256, 1, 1, None).unwrap_or_default()
}

fn hashing_failed(detail: impl Into<String>) -> DomainError {
    DomainError::infra(InfraErrorKind::Other("PasswordHash".into()), detail)
}

#[derive(Clone)]
pub struct EmailPasswordProvider {
    store: Arc<dyn CredentialStore>,
    hasher: Argon2<'static>,
}

impl EmailPasswordProvider {
    /// Argon2id at the crate's default cost.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self::with_params(store, Params::default())
    }

    pub fn with_params(store: Arc<dyn CredentialStore>, params: Params) -> Self {
        Self {
            store,
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Create an account. The returned subject is what sign-in yields later.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> Result<VerifiedSubject, RegisterError> {
        let email = validate_email(email)?;
        let problems = password_problems(password);
        if !problems.is_empty() {
            return Err(RegisterError::WeakPassword(problems));
        }
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict(
                ConflictKind::EmailRegistered,
                "Email already registered",
            )
            .into());
        }

        let password_hash = self.hash(password).await?;
        let subject_id = Uuid::new_v4().simple().to_string();
        self.store
            .insert(PasswordCredential {
                email: email.clone(),
                subject_id: subject_id.clone(),
                password_hash,
                created_at: OffsetDateTime::now_utc(),
            })
            .await?;

        info!(subject_id = %subject_id, "email account registered");
        Ok(VerifiedSubject { subject_id, email })
    }

    async fn hash(&self, password: &str) -> Result<String, DomainError> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            hasher
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
        })
        .await
        .map_err(|e| hashing_failed(e.to_string()))?
        .map_err(|e| hashing_failed(e.to_string()))
    }

    /// Cost parameters come from the stored PHC string, not from `self`.
    async fn matches(&self, password: &str, phc: &str) -> Result<bool, DomainError> {
        let hasher = self.hasher.clone();
        let (password, phc) = (password.to_owned(), phc.to_owned());
        tokio::task::spawn_blocking(move || {
            PasswordHash::new(&phc).is_ok_and(|parsed| {
                hasher.verify_password(password.as_bytes(), &parsed).is_ok()
            })
        })
        .await
        .map_err(|e| hashing_failed(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for EmailPasswordProvider {
    fn provider(&self) -> Provider {
        Provider::Email
    }

    async fn verify(&self, credential: Credential<'_>) -> Result<VerifiedSubject, AuthError> {
        let Credential::Password { email, password } = credential else {
            return Err(AuthError::provider("email sign-in expects an email and password"));
        };
        let Ok(email) = validate_email(email) else {
            return Err(AuthError::provider(REJECTED));
        };

        let account = self
            .store
            .find_by_email(&email)
            .await
            .map_err(|e| AuthError::persistence(e.to_string()))?
            .ok_or_else(|| AuthError::provider(REJECTED))?;

        let matched = self
            .matches(password, &account.password_hash)
            .await
            .map_err(|e| AuthError::persistence(e.to_string()))?;
        if !matched {
            warn!(subject_id = %account.subject_id, "password mismatch");
            return Err(AuthError::provider(REJECTED));
        }

        Ok(VerifiedSubject {
            subject_id: account.subject_id,
            email: account.email,
        })
    }
}
