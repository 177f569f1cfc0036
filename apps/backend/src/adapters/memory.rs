//! In-memory store implementations backed by `DashMap`.
//!
//! Used when no database is configured and throughout the test suite.

use std::cmp::Reverse;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::claims::{Provider, UserId};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::{
    Block, CredentialStore, Match, MatchStore, NewProfile, PasswordCredential, Profile,
    ProfileChanges, ProfileStore, Report, ReportReason, SafetyStore, UserRecord, UserStore,
};

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<UserId, UserRecord>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_or_create_user(
        &self,
        user_id: &UserId,
        provider: Provider,
        email: &str,
    ) -> Result<UserRecord, DomainError> {
        let now = OffsetDateTime::now_utc();
        let record = self
            .users
            .entry(user_id.clone())
            .and_modify(|existing| {
                if existing.email != email {
                    existing.email = email.to_string();
                    existing.updated_at = now;
                }
            })
            .or_insert_with(|| UserRecord {
                user_id: user_id.clone(),
                provider,
                email: email.to_string(),
                created_at: now,
                updated_at: now,
            })
            .value()
            .clone();
        Ok(record)
    }

    async fn get_user(&self, user_id: &UserId) -> Result<UserRecord, DomainError> {
        self.users
            .get(user_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| DomainError::not_found(NotFoundKind::User, format!("user {user_id}")))
    }
}

/// Email accounts keyed by normalized address.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    accounts: DashMap<String, PasswordCredential>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn insert(&self, credential: PasswordCredential) -> Result<(), DomainError> {
        match self.accounts.entry(credential.email.clone()) {
            Entry::Occupied(_) => Err(DomainError::conflict(
                ConflictKind::EmailRegistered,
                "Email already registered",
            )),
            Entry::Vacant(slot) => {
                slot.insert(credential);
                Ok(())
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<PasswordCredential>, DomainError> {
        Ok(self.accounts.get(email).map(|c| c.value().clone()))
    }
}

#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: DashMap<String, Profile>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn create(&self, user_id: &str, profile: NewProfile) -> Result<Profile, DomainError> {
        match self.profiles.entry(user_id.to_string()) {
            Entry::Occupied(_) => Err(DomainError::conflict(
                ConflictKind::ProfileExists,
                format!("profile for {user_id} already exists"),
            )),
            Entry::Vacant(slot) => {
                let now = OffsetDateTime::now_utc();
                let created = Profile {
                    user_id: user_id.to_string(),
                    name: profile.name,
                    age: profile.age,
                    bio: profile.bio,
                    photos: profile.photos,
                    interests: profile.interests,
                    created_at: now,
                    updated_at: now,
                };
                Ok(slot.insert(created).value().clone())
            }
        }
    }

    async fn get(&self, user_id: &str) -> Result<Option<Profile>, DomainError> {
        Ok(self.profiles.get(user_id).map(|p| p.value().clone()))
    }

    async fn update(
        &self,
        user_id: &str,
        changes: ProfileChanges,
    ) -> Result<Option<Profile>, DomainError> {
        let Some(mut profile) = self.profiles.get_mut(user_id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            profile.name = name;
        }
        if let Some(age) = changes.age {
            profile.age = age;
        }
        if let Some(bio) = changes.bio {
            profile.bio = Some(bio);
        }
        if let Some(photos) = changes.photos {
            profile.photos = photos;
        }
        if let Some(interests) = changes.interests {
            profile.interests = interests;
        }
        profile.updated_at = OffsetDateTime::now_utc();
        Ok(Some(profile.clone()))
    }

    async fn delete(&self, user_id: &str) -> Result<bool, DomainError> {
        Ok(self.profiles.remove(user_id).is_some())
    }

    async fn discover(
        &self,
        exclude: &[String],
        limit: usize,
    ) -> Result<Vec<Profile>, DomainError> {
        let mut found: Vec<Profile> = self
            .profiles
            .iter()
            .filter(|p| !exclude.contains(p.key()))
            .map(|p| p.value().clone())
            .collect();
        // Newest first; id as tiebreak for a stable order.
        found.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        found.truncate(limit);
        Ok(found)
    }
}

#[derive(Debug, Default)]
pub struct MemorySafetyStore {
    reports: DashMap<Uuid, Report>,
    blocks: DashMap<(String, String), Block>,
}

impl MemorySafetyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_count(&self) -> usize {
        self.reports.len()
    }
}

#[async_trait]
impl SafetyStore for MemorySafetyStore {
    async fn add_report(
        &self,
        reporter_id: &str,
        reported_user_id: &str,
        reason: ReportReason,
        details: Option<String>,
    ) -> Result<Report, DomainError> {
        let report = Report {
            id: Uuid::new_v4(),
            reporter_id: reporter_id.to_string(),
            reported_user_id: reported_user_id.to_string(),
            reason,
            details,
            status: "pending",
            created_at: OffsetDateTime::now_utc(),
        };
        self.reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn add_block(
        &self,
        user_id: &str,
        blocked_user_id: &str,
        reason: Option<String>,
    ) -> Result<Block, DomainError> {
        let key = (user_id.to_string(), blocked_user_id.to_string());
        let block = self
            .blocks
            .entry(key)
            .or_insert_with(|| Block {
                user_id: user_id.to_string(),
                blocked_user_id: blocked_user_id.to_string(),
                reason,
                created_at: OffsetDateTime::now_utc(),
            })
            .value()
            .clone();
        Ok(block)
    }

    async fn blocks_by(&self, user_id: &str) -> Result<Vec<Block>, DomainError> {
        let mut blocks: Vec<Block> = self
            .blocks
            .iter()
            .filter(|b| b.key().0 == user_id)
            .map(|b| b.value().clone())
            .collect();
        blocks.sort_by_key(|b| Reverse(b.created_at));
        Ok(blocks)
    }

    async fn is_blocked_between(&self, a: &str, b: &str) -> Result<bool, DomainError> {
        Ok(self.blocks.contains_key(&(a.to_string(), b.to_string()))
            || self.blocks.contains_key(&(b.to_string(), a.to_string())))
    }
}

#[derive(Debug, Default)]
pub struct MemoryMatchStore {
    matches: DashMap<(String, String), Match>,
}

impl MemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[async_trait]
impl MatchStore for MemoryMatchStore {
    async fn create_or_get(
        &self,
        user_id1: &str,
        user_id2: &str,
    ) -> Result<(Match, bool), DomainError> {
        match self.matches.entry(pair_key(user_id1, user_id2)) {
            Entry::Occupied(existing) => Ok((existing.get().clone(), false)),
            Entry::Vacant(slot) => {
                let created = Match {
                    id: Uuid::new_v4(),
                    user_id1: user_id1.to_string(),
                    user_id2: user_id2.to_string(),
                    created_at: OffsetDateTime::now_utc(),
                };
                Ok((slot.insert(created).value().clone(), true))
            }
        }
    }
}
