//! Process configuration read from the environment at startup.

use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;
use crate::middleware::cors::parse_origins;
use crate::state::security_config::SecurityConfig;

/// Route groups a process can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceGroup {
    Auth,
    Profile,
    Chat,
}

impl ServiceGroup {
    pub const ALL: [ServiceGroup; 3] = [ServiceGroup::Auth, ServiceGroup::Profile, ServiceGroup::Chat];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ServiceGroup::Auth => "auth",
            ServiceGroup::Profile => "profile",
            ServiceGroup::Chat => "chat",
        }
    }
}

impl fmt::Display for ServiceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceGroup {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceGroup::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::config(format!("unknown service group '{s}' in APP_SERVICES")))
    }
}

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    jwt_secret: String,
    pub services: BTreeSet<ServiceGroup>,
    pub database_url: Option<String>,
    pub google_client_ids: Vec<String>,
    pub apple_client_ids: Vec<String>,
    /// Mounts email and password accounts as the `email` provider.
    pub email_signin_enabled: bool,
    pub provider_timeout: Duration,
    pub store_timeout: Duration,
    pub cors_allowed_origins: Vec<String>,
    pub rate_limit_enabled: bool,
}

fn must_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, AppError> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::config(format!("{key} must be set")))
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError> {
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("{key} has an invalid value: '{raw}'"))),
    }
}

fn list_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Vec<String> {
    lookup(key)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. A missing `JWT_SECRET` is fatal.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let jwt_secret = must_var(&lookup, "JWT_SECRET")?;

        let services = match lookup("APP_SERVICES").filter(|v| !v.trim().is_empty()) {
            None => ServiceGroup::ALL.into_iter().collect(),
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse)
                .collect::<Result<BTreeSet<_>, _>>()?,
        };

        Ok(Self {
            host: lookup("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(&lookup, "BACKEND_PORT", 3001)?,
            jwt_secret,
            services,
            database_url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            google_client_ids: list_var(&lookup, "GOOGLE_CLIENT_IDS"),
            apple_client_ids: list_var(&lookup, "APPLE_CLIENT_IDS"),
            email_signin_enabled: parse_var(&lookup, "EMAIL_SIGNIN_ENABLED", false)?,
            provider_timeout: Duration::from_secs(parse_var(&lookup, "PROVIDER_TIMEOUT_SECS", 5)?),
            store_timeout: Duration::from_secs(parse_var(&lookup, "STORE_TIMEOUT_SECS", 5)?),
            cors_allowed_origins: parse_origins(&lookup("CORS_ALLOWED_ORIGINS").unwrap_or_default()),
            rate_limit_enabled: parse_var(&lookup, "RATE_LIMIT_ENABLED", true)?,
        })
    }

    pub fn security(&self) -> Result<SecurityConfig, AppError> {
        SecurityConfig::new(self.jwt_secret.as_bytes()).map_err(AppError::from)
    }

    pub fn serves(&self, group: ServiceGroup) -> bool {
        self.services.contains(&group)
    }

    /// Name reported by `/health`, e.g. `auth,profile`.
    pub fn service_name(&self) -> String {
        self.services
            .iter()
            .map(ServiceGroup::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"[REDACTED]")
            .field("services", &self.services)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("google_client_ids", &self.google_client_ids)
            .field("apple_client_ids", &self.apple_client_ids)
            .field("email_signin_enabled", &self.email_signin_enabled)
            .field("provider_timeout", &self.provider_timeout)
            .field("store_timeout", &self.store_timeout)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("rate_limit_enabled", &self.rate_limit_enabled)
            .finish()
    }
}
