//! Password credentials for email sign-in.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::errors::domain::DomainError;

/// One registered email account. `password_hash` is a PHC string.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordCredential {
    /// Normalized address; unique across accounts.
    pub email: String,
    /// Stable subject behind the `email_<subject>` user id.
    pub subject_id: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

impl std::fmt::Debug for PasswordCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredential")
            .field("email", &self.email)
            .field("subject_id", &self.subject_id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `DomainError::Conflict(ConflictKind::EmailRegistered, ..)` when the
    /// email already has an account.
    async fn insert(&self, credential: PasswordCredential) -> Result<(), DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<PasswordCredential>, DomainError>;
}
