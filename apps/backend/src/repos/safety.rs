//! Blocks and reports.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    InappropriateContent,
    Harassment,
    Spam,
    FakeProfile,
    Underage,
    ViolenceThreats,
    HateSpeech,
    Scam,
    Other,
}

impl ReportReason {
    pub const ALL: [ReportReason; 9] = [
        ReportReason::InappropriateContent,
        ReportReason::Harassment,
        ReportReason::Spam,
        ReportReason::FakeProfile,
        ReportReason::Underage,
        ReportReason::ViolenceThreats,
        ReportReason::HateSpeech,
        ReportReason::Scam,
        ReportReason::Other,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ReportReason::InappropriateContent => "inappropriate_content",
            ReportReason::Harassment => "harassment",
            ReportReason::Spam => "spam",
            ReportReason::FakeProfile => "fake_profile",
            ReportReason::Underage => "underage",
            ReportReason::ViolenceThreats => "violence_threats",
            ReportReason::HateSpeech => "hate_speech",
            ReportReason::Scam => "scam",
            ReportReason::Other => "other",
        }
    }
}

impl fmt::Display for ReportReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportReason {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportReason::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub reporter_id: String,
    pub reported_user_id: String,
    pub reason: ReportReason,
    pub details: Option<String>,
    pub status: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub user_id: String,
    pub blocked_user_id: String,
    pub reason: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait SafetyStore: Send + Sync {
    async fn add_report(
        &self,
        reporter_id: &str,
        reported_user_id: &str,
        reason: ReportReason,
        details: Option<String>,
    ) -> Result<Report, DomainError>;

    /// Blocking the same user twice keeps the first block.
    async fn add_block(
        &self,
        user_id: &str,
        blocked_user_id: &str,
        reason: Option<String>,
    ) -> Result<Block, DomainError>;

    /// Blocks created by `user_id`, newest first.
    async fn blocks_by(&self, user_id: &str) -> Result<Vec<Block>, DomainError>;

    /// True if either user has blocked the other.
    async fn is_blocked_between(&self, a: &str, b: &str) -> Result<bool, DomainError>;
}
