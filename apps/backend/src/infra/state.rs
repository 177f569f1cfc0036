use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use tracing::info;

use argon2::Params;

use crate::adapters::memory::{
    MemoryCredentialStore, MemoryMatchStore, MemoryProfileStore, MemorySafetyStore,
    MemoryUserStore,
};
use crate::adapters::users_sea::SeaUserStore;
use crate::auth::{AuthorizationGate, TokenIssuer, TokenVerifier};
use crate::config::{Config, ServiceGroup};
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::providers::{EmailPasswordProvider, OidcConfig, OidcIdTokenVerifier, ProviderRegistry};
use crate::repos::UserStore;
use crate::services::{MatchService, ProfileService, SafetyService};
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main).
///
/// Defaults: test signing secret, no providers, in-memory stores, throttling
/// on. `build` must run inside the actix runtime.
pub struct StateBuilder {
    security_config: SecurityConfig,
    providers: ProviderRegistry,
    /// Argon2 cost for email accounts; `None` leaves email sign-in off.
    email_signin: Option<Params>,
    users: Option<Arc<dyn UserStore>>,
    db_url: Option<String>,
    provider_timeout: Duration,
    store_timeout: Duration,
    rate_limit_enabled: bool,
    services: BTreeSet<ServiceGroup>,
    service_name: String,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::for_tests(),
            providers: ProviderRegistry::new(),
            email_signin: None,
            users: None,
            db_url: None,
            provider_timeout: Duration::from_secs(5),
            store_timeout: Duration::from_secs(5),
            rate_limit_enabled: true,
            services: ServiceGroup::ALL.into_iter().collect(),
            service_name: "dating-backend".to_string(),
        }
    }

    /// Everything `main` needs: secret, OIDC providers, database, limits.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let mut providers = ProviderRegistry::new();
        if !config.google_client_ids.is_empty() {
            providers.register(Arc::new(OidcIdTokenVerifier::new(
                OidcConfig::google(config.google_client_ids.clone()),
                config.provider_timeout,
            )?));
        }
        if !config.apple_client_ids.is_empty() {
            providers.register(Arc::new(OidcIdTokenVerifier::new(
                OidcConfig::apple(config.apple_client_ids.clone()),
                config.provider_timeout,
            )?));
        }

        let mut builder = Self::new()
            .with_security(config.security()?)
            .with_providers(providers)
            .with_timeouts(config.provider_timeout, config.store_timeout)
            .with_rate_limit(config.rate_limit_enabled)
            .with_services(config.services.clone())
            .with_service_name(config.service_name());
        if let Some(url) = &config.database_url {
            builder = builder.with_db_url(url.clone());
        }
        if config.email_signin_enabled {
            builder = builder.with_email_signin(Params::default());
        }
        Ok(builder)
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_providers(mut self, providers: ProviderRegistry) -> Self {
        self.providers = providers;
        self
    }

    pub fn with_email_signin(mut self, params: Params) -> Self {
        self.email_signin = Some(params);
        self
    }

    pub fn with_users(mut self, users: Arc<dyn UserStore>) -> Self {
        self.users = Some(users);
        self
    }

    pub fn with_db_url(mut self, url: impl Into<String>) -> Self {
        self.db_url = Some(url.into());
        self
    }

    pub fn with_timeouts(mut self, provider_timeout: Duration, store_timeout: Duration) -> Self {
        self.provider_timeout = provider_timeout;
        self.store_timeout = store_timeout;
        self
    }

    pub fn with_rate_limit(mut self, enabled: bool) -> Self {
        self.rate_limit_enabled = enabled;
        self
    }

    pub fn with_services(mut self, services: BTreeSet<ServiceGroup>) -> Self {
        self.services = services;
        self
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let mut db = None;
        let users: Arc<dyn UserStore> = match (self.users, self.db_url) {
            (Some(users), _) => users,
            (None, Some(url)) => {
                let conn = Arc::new(bootstrap_db(&url, self.store_timeout).await?);
                info!("user store: postgres");
                db = Some(Arc::clone(&conn));
                Arc::new(SeaUserStore::new(conn))
            }
            (None, None) => {
                info!("user store: in-memory");
                Arc::new(MemoryUserStore::new())
            }
        };

        let mut providers = self.providers;
        let email_accounts = self.email_signin.map(|params| {
            let accounts = Arc::new(EmailPasswordProvider::with_params(
                Arc::new(MemoryCredentialStore::new()),
                params,
            ));
            providers.register(accounts.clone());
            accounts
        });

        let safety = Arc::new(MemorySafetyStore::new());
        let issuer = TokenIssuer::new(self.security_config.clone(), providers, users.clone())
            .with_timeouts(self.provider_timeout, self.store_timeout);

        Ok(AppState {
            db,
            verifier: TokenVerifier::new(self.security_config.clone()),
            security: self.security_config,
            issuer,
            email_accounts,
            gate: AuthorizationGate,
            users,
            profiles: ProfileService::new(Arc::new(MemoryProfileStore::new()), safety.clone()),
            safety: SafetyService::new(safety.clone()),
            matches: MatchService::new(Arc::new(MemoryMatchStore::new()), safety),
            throttle_backend: InMemoryBackend::builder().build(),
            rate_limit_enabled: self.rate_limit_enabled,
            services: self.services,
            service_name: self.service_name,
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
