//! Profile storage.

use async_trait::async_trait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::errors::domain::DomainError;

/// Public profile fields. Every field is visible to other users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub name: String,
    pub age: u8,
    pub bio: Option<String>,
    pub photos: Vec<String>,
    pub interests: Vec<String>,
    #[serde(skip)]
    pub created_at: OffsetDateTime,
    #[serde(skip)]
    pub updated_at: OffsetDateTime,
}

/// Validated input for profile creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub name: String,
    pub age: u8,
    pub bio: Option<String>,
    pub photos: Vec<String>,
    pub interests: Vec<String>,
}

/// Validated partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub age: Option<u8>,
    pub bio: Option<String>,
    pub photos: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `Conflict(ProfileExists)` if the user already has a profile.
    async fn create(&self, user_id: &str, profile: NewProfile) -> Result<Profile, DomainError>;

    async fn get(&self, user_id: &str) -> Result<Option<Profile>, DomainError>;

    /// `None` when there is no profile to update.
    async fn update(
        &self,
        user_id: &str,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, DomainError>;

    /// Returns whether a profile was removed.
    async fn delete(&self, user_id: &str) -> Result<bool, DomainError>;

    /// Up to `limit` profiles not owned by any id in `exclude`.
    async fn discover(&self, exclude: &[String], limit: usize)
        -> Result<Vec<Profile>, DomainError>;
}
