use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::auth::{AuthorizationGate, TokenIssuer, TokenVerifier};
use crate::config::ServiceGroup;
use crate::providers::EmailPasswordProvider;
use crate::repos::UserStore;
use crate::services::{MatchService, ProfileService, SafetyService};

/// Shared per-process state handed to every handler through `web::Data`.
pub struct AppState {
    /// Present only when `DATABASE_URL` is configured.
    pub db: Option<Arc<DatabaseConnection>>,
    pub security: SecurityConfig,
    pub verifier: TokenVerifier,
    pub issuer: TokenIssuer,
    /// Registration side of the `email` provider, when enabled.
    pub email_accounts: Option<Arc<EmailPasswordProvider>>,
    pub gate: AuthorizationGate,
    pub users: Arc<dyn UserStore>,
    pub profiles: ProfileService,
    pub safety: SafetyService,
    pub matches: MatchService,
    /// Counters shared by every throttled scope.
    pub throttle_backend: InMemoryBackend,
    pub rate_limit_enabled: bool,
    /// Route groups mounted by this process.
    pub services: BTreeSet<ServiceGroup>,
    pub service_name: String,
}

impl AppState {
    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_deref()
    }

    pub fn serves(&self, group: ServiceGroup) -> bool {
        self.services.contains(&group)
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("security", &self.security)
            .field("providers", self.issuer.providers())
            .field("rate_limit_enabled", &self.rate_limit_enabled)
            .field("services", &self.services)
            .field("service_name", &self.service_name)
            .finish_non_exhaustive()
    }
}
