//! User store: the collaborator the token issuer persists identities through.

use async_trait::async_trait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::auth::claims::{Provider, UserId};
use crate::errors::domain::DomainError;

/// Persistent user record keyed by canonical user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: UserId,
    pub provider: Provider,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Return the record for `user_id`, creating it on first sign-in.
    ///
    /// An existing record keeps its `created_at`; its email is refreshed.
    async fn find_or_create_user(
        &self,
        user_id: &UserId,
        provider: Provider,
        email: &str,
    ) -> Result<UserRecord, DomainError>;

    /// `DomainError::NotFound(NotFoundKind::User, ..)` when absent.
    async fn get_user(&self, user_id: &UserId) -> Result<UserRecord, DomainError>;
}
