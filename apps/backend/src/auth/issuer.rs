//! Token issuance: provider proof in, signed identity token out.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use thiserror::Error;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::auth::claims::{IdentityClaims, Provider, UserId};
use crate::auth::email::{validate_email, EmailError};
use crate::auth::error::AuthError;
use crate::auth::jwt::{sign_claims, unix_seconds};
use crate::providers::{Credential, ProviderRegistry};
use crate::repos::UserStore;
use crate::state::security_config::SecurityConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub user_id: UserId,
    pub provider: Provider,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// The provider vouched for an email this service will not put in a token.
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),
}

pub struct TokenIssuer {
    security: SecurityConfig,
    providers: ProviderRegistry,
    users: Arc<dyn UserStore>,
    provider_timeout: Duration,
    store_timeout: Duration,
}

impl TokenIssuer {
    pub fn new(
        security: SecurityConfig,
        providers: ProviderRegistry,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            security,
            providers,
            users,
            provider_timeout: Duration::from_secs(5),
            store_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeouts(mut self, provider_timeout: Duration, store_timeout: Duration) -> Self {
        self.provider_timeout = provider_timeout;
        self.store_timeout = store_timeout;
        self
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub async fn issue(
        &self,
        provider: Provider,
        credential: Credential<'_>,
    ) -> Result<IssuedToken, IssueError> {
        self.issue_at(provider, credential, SystemTime::now()).await
    }

    /// Verify `credential` with `provider`, record the user, and sign a token
    /// valid for seven days from `now`.
    pub async fn issue_at(
        &self,
        provider: Provider,
        credential: Credential<'_>,
        now: SystemTime,
    ) -> Result<IssuedToken, IssueError> {
        let verifier = self.providers.get(provider)?;

        let subject = timeout(self.provider_timeout, verifier.verify(credential))
            .await
            .map_err(|_| AuthError::provider(format!("{provider} verification timed out")))??;

        let user_id = UserId::canonical(provider, &subject.subject_id)?;
        let email = validate_email(&subject.email)?;

        let stored = timeout(
            self.store_timeout,
            self.users.find_or_create_user(&user_id, provider, &email),
        )
        .await
        .map_err(|_| AuthError::persistence("user store timed out"))?;
        if let Err(e) = stored {
            warn!(user_id = %user_id, error = %e, "user store rejected sign-in");
            return Err(AuthError::persistence(e.to_string()).into());
        }

        let claims = IdentityClaims::new(user_id.clone(), provider, email, unix_seconds(now));
        let token = sign_claims(&claims, &self.security)?;

        info!(user_id = %user_id, provider = %provider, "token issued");
        Ok(IssuedToken {
            token,
            user_id,
            provider,
        })
    }
}
