//! Profile domain service.

use std::sync::Arc;

use lazy_regex::regex_is_match;
use reqwest::Url;
use serde::Deserialize;

use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::{NewProfile, Profile, ProfileChanges, ProfileStore, SafetyStore};

pub const DISCOVER_LIMIT: usize = 10;
const MAX_PHOTOS: usize = 6;
const MAX_INTERESTS: usize = 10;

/// Profile fields as sent by clients, for both create and update.
///
/// A `userId` in the body is accepted and ignored; the owner always comes
/// from the token.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub bio: Option<String>,
    pub photos: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    #[serde(default)]
    pub user_id: Option<String>,
}

fn validate_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    let len = name.chars().count();
    if !(2..=100).contains(&len) {
        return Err(DomainError::validation(
            "Name must be between 2 and 100 characters",
        ));
    }
    if !regex_is_match!(r"^[A-Za-z0-9 ]+$", name) {
        return Err(DomainError::validation(
            "Name can only contain letters, numbers, and spaces",
        ));
    }
    Ok(name.to_string())
}

fn validate_age(age: i64) -> Result<u8, DomainError> {
    u8::try_from(age)
        .ok()
        .filter(|a| (18..=120).contains(a))
        .ok_or_else(|| DomainError::validation("Age must be at least 18 and no more than 120"))
}

fn validate_bio(raw: &str) -> Result<String, DomainError> {
    let bio = raw.trim();
    if bio.chars().count() > 500 {
        return Err(DomainError::validation("Bio must be maximum 500 characters"));
    }
    Ok(bio.to_string())
}

fn validate_photos(photos: Vec<String>) -> Result<Vec<String>, DomainError> {
    if photos.len() > MAX_PHOTOS {
        return Err(DomainError::validation(format!(
            "Photos must be an array with maximum {MAX_PHOTOS} items"
        )));
    }
    for photo in &photos {
        let ok = Url::parse(photo)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
            .unwrap_or(false);
        if !ok {
            return Err(DomainError::validation("Each photo must be a valid URL"));
        }
    }
    Ok(photos)
}

fn validate_interests(interests: Vec<String>) -> Result<Vec<String>, DomainError> {
    if interests.len() > MAX_INTERESTS {
        return Err(DomainError::validation(format!(
            "Interests must be an array with maximum {MAX_INTERESTS} items"
        )));
    }
    interests
        .into_iter()
        .map(|interest| {
            let trimmed = interest.trim();
            if (1..=50).contains(&trimmed.chars().count()) {
                Ok(trimmed.to_string())
            } else {
                Err(DomainError::validation(
                    "Each interest must be between 1 and 50 characters",
                ))
            }
        })
        .collect()
}

/// Validate a creation payload; `name` and `age` are required.
pub fn validate_new(payload: ProfilePayload) -> Result<NewProfile, DomainError> {
    let name = payload
        .name
        .ok_or_else(|| DomainError::validation("Name is required"))?;
    let age = payload
        .age
        .ok_or_else(|| DomainError::validation("Age is required"))?;

    Ok(NewProfile {
        name: validate_name(&name)?,
        age: validate_age(age)?,
        bio: payload.bio.as_deref().map(validate_bio).transpose()?,
        photos: validate_photos(payload.photos.unwrap_or_default())?,
        interests: validate_interests(payload.interests.unwrap_or_default())?,
    })
}

/// Validate an update payload; every field is optional.
pub fn validate_changes(payload: ProfilePayload) -> Result<ProfileChanges, DomainError> {
    Ok(ProfileChanges {
        name: payload.name.as_deref().map(validate_name).transpose()?,
        age: payload.age.map(validate_age).transpose()?,
        bio: payload.bio.as_deref().map(validate_bio).transpose()?,
        photos: payload.photos.map(validate_photos).transpose()?,
        interests: payload.interests.map(validate_interests).transpose()?,
    })
}

fn profile_not_found(user_id: &str) -> DomainError {
    DomainError::not_found(NotFoundKind::Profile, format!("profile for {user_id}"))
}

pub struct ProfileService {
    profiles: Arc<dyn ProfileStore>,
    safety: Arc<dyn SafetyStore>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileStore>, safety: Arc<dyn SafetyStore>) -> Self {
        Self { profiles, safety }
    }

    pub async fn create(&self, owner: &str, payload: ProfilePayload) -> Result<Profile, DomainError> {
        let profile = validate_new(payload)?;
        self.profiles.create(owner, profile).await
    }

    pub async fn get(&self, user_id: &str) -> Result<Profile, DomainError> {
        self.profiles
            .get(user_id)
            .await?
            .ok_or_else(|| profile_not_found(user_id))
    }

    pub async fn update(
        &self,
        user_id: &str,
        payload: ProfilePayload,
    ) -> Result<Profile, DomainError> {
        let changes = validate_changes(payload)?;
        self.profiles
            .update(user_id, changes)
            .await?
            .ok_or_else(|| profile_not_found(user_id))
    }

    pub async fn delete(&self, user_id: &str) -> Result<(), DomainError> {
        if self.profiles.delete(user_id).await? {
            Ok(())
        } else {
            Err(profile_not_found(user_id))
        }
    }

    /// Other users' profiles, minus anyone the caller has blocked.
    pub async fn discover(&self, actor: &str) -> Result<Vec<Profile>, DomainError> {
        let mut exclude: Vec<String> = self
            .safety
            .blocks_by(actor)
            .await?
            .into_iter()
            .map(|b| b.blocked_user_id)
            .collect();
        exclude.push(actor.to_string());
        self.profiles.discover(&exclude, DISCOVER_LIMIT).await
    }
}
