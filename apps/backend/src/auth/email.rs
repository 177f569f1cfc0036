//! Email normalization and validation for identity claims.
//!
//! Provider-supplied emails end up inside signed tokens and are later used by
//! other services, so they are normalized and checked before issuance.

use lazy_regex::regex_is_match;
use unicode_normalization::UnicodeNormalization;

/// Domains (substring match) that point back at the host itself.
const BLOCKED_DOMAIN_FRAGMENTS: [&str; 3] = ["localhost", "127.0.0.1", "0.0.0.0"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    #[error("invalid email format")]
    Format,
    #[error("invalid email domain")]
    BlockedDomain,
}

/// Normalize an email address for consistent storage and comparison.
///
/// Trims surrounding whitespace, applies Unicode NFKC normalization to fold
/// visually equivalent codepoints, then lower-cases.
pub fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}

/// Normalize and validate an email; returns the lower-cased form.
pub fn validate_email(email: &str) -> Result<String, EmailError> {
    let normalized = normalize_email(email);

    if !regex_is_match!(
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$",
        &normalized
    ) {
        return Err(EmailError::Format);
    }

    let domain = normalized
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .ok_or(EmailError::Format)?;
    if BLOCKED_DOMAIN_FRAGMENTS
        .iter()
        .any(|fragment| domain.contains(fragment))
    {
        return Err(EmailError::BlockedDomain);
    }

    Ok(normalized)
}
