//! Identity claims carried inside backend-issued tokens.

use std::fmt;
use std::str::FromStr;

use lazy_regex::regex_is_match;
use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;

/// Fixed token lifetime: 7 days.
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// External identity providers a user can sign in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Apple,
    Email,
    Instagram,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Google,
        Provider::Apple,
        Provider::Email,
        Provider::Instagram,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Apple => "apple",
            Provider::Email => "email",
            Provider::Instagram => "instagram",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown provider '{s}'"))
    }
}

/// Canonical user id: `<provider>_<providerSubjectId>`.
///
/// Construct through [`UserId::canonical`] or [`UserId::parse`]. Deserializing
/// (from a verified token) does not re-validate: the signature is the trust
/// boundary and the claim is returned exactly as it was signed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Derive the canonical id from a provider-verified subject.
    pub fn canonical(provider: Provider, subject_id: &str) -> Result<Self, AuthError> {
        if !regex_is_match!(r"^[A-Za-z0-9._-]+$", subject_id) {
            return Err(AuthError::provider(format!(
                "{provider} returned a subject id outside [A-Za-z0-9._-]"
            )));
        }
        Ok(UserId(format!("{}_{}", provider.as_str(), subject_id)))
    }

    /// Parse an id received from a client (path or body), checking the grammar.
    pub fn parse(raw: &str) -> Option<Self> {
        regex_is_match!(r"^(google|apple|email|instagram)_[A-Za-z0-9._-]+$", raw)
            .then(|| UserId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Provider prefix, if the id follows the canonical grammar.
    pub fn provider(&self) -> Option<Provider> {
        let (prefix, _) = self.0.split_once('_')?;
        prefix.parse().ok()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Claims included in backend-issued tokens.
///
/// Field names are shared with every service that verifies these tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClaims {
    pub user_id: UserId,
    pub provider: Provider,
    pub email: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl IdentityClaims {
    /// Claims valid for the fixed 7-day lifetime starting at `issued_at`.
    pub fn new(user_id: UserId, provider: Provider, email: String, issued_at: i64) -> Self {
        Self {
            user_id,
            provider,
            email,
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECS,
        }
    }

    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        now_secs >= self.exp
    }
}
