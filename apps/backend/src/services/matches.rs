//! Match creation.

use std::sync::Arc;

use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::{Match, MatchStore, SafetyStore};

pub struct MatchService {
    matches: Arc<dyn MatchStore>,
    safety: Arc<dyn SafetyStore>,
}

impl MatchService {
    pub fn new(matches: Arc<dyn MatchStore>, safety: Arc<dyn SafetyStore>) -> Self {
        Self { matches, safety }
    }

    /// Create (or return the existing) match between `actor` and `other`.
    ///
    /// Users with a block between them in either direction cannot match.
    pub async fn create(&self, actor: &str, other: &str) -> Result<(Match, bool), DomainError> {
        if self.safety.is_blocked_between(actor, other).await? {
            return Err(DomainError::conflict(
                ConflictKind::Other("Blocked".into()),
                "Cannot match with a blocked user",
            ));
        }
        self.matches.create_or_get(actor, other).await
    }
}
