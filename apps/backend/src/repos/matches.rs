//! Match storage.

use async_trait::async_trait;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub user_id1: String,
    pub user_id2: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Match {
    pub fn involves(&self, a: &str, b: &str) -> bool {
        (self.user_id1 == a && self.user_id2 == b) || (self.user_id1 == b && self.user_id2 == a)
    }
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Create a match between two users, or return the existing one for the
    /// same pair in either order. The bool is true when a match was created.
    async fn create_or_get(
        &self,
        user_id1: &str,
        user_id2: &str,
    ) -> Result<(Match, bool), DomainError>;
}
