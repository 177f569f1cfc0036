//! Reports and blocks.

use std::sync::Arc;

use crate::errors::domain::DomainError;
use crate::repos::{Block, Report, ReportReason, SafetyStore};

const MAX_DETAILS: usize = 1000;
const MAX_BLOCK_REASON: usize = 500;

/// Trim optional free text; blank becomes `None`.
fn optional_text(raw: Option<&str>, max: usize, what: &str) -> Result<Option<String>, DomainError> {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{what} must be maximum {max} characters"
        )));
    }
    Ok(Some(text.to_string()))
}

pub fn parse_reason(raw: Option<&str>) -> Result<ReportReason, DomainError> {
    let raw = raw
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| DomainError::validation("Reason is required"))?;
    raw.parse().map_err(|_| {
        let valid: Vec<&str> = ReportReason::ALL.iter().map(|r| r.as_str()).collect();
        DomainError::validation(format!("Reason must be one of: {}", valid.join(", ")))
    })
}

pub struct SafetyService {
    store: Arc<dyn SafetyStore>,
}

impl SafetyService {
    pub fn new(store: Arc<dyn SafetyStore>) -> Self {
        Self { store }
    }

    pub async fn report(
        &self,
        reporter_id: &str,
        reported_user_id: &str,
        reason: Option<&str>,
        details: Option<&str>,
    ) -> Result<Report, DomainError> {
        let reason = parse_reason(reason)?;
        let details = optional_text(details, MAX_DETAILS, "Details")?;
        self.store
            .add_report(reporter_id, reported_user_id, reason, details)
            .await
    }

    pub async fn block(
        &self,
        user_id: &str,
        blocked_user_id: &str,
        reason: Option<&str>,
    ) -> Result<Block, DomainError> {
        let reason = optional_text(reason, MAX_BLOCK_REASON, "Reason")?;
        self.store.add_block(user_id, blocked_user_id, reason).await
    }

    pub async fn blocks(&self, user_id: &str) -> Result<Vec<Block>, DomainError> {
        self.store.blocks_by(user_id).await
    }

    pub async fn is_blocked_between(&self, a: &str, b: &str) -> Result<bool, DomainError> {
        self.store.is_blocked_between(a, b).await
    }
}
