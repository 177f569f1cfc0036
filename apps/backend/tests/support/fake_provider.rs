//! Scripted identity provider for tests.

use async_trait::async_trait;
use dating_backend::auth::error::AuthError;
use dating_backend::auth::Provider;
use dating_backend::providers::{Credential, IdentityProvider, VerifiedSubject};

/// Accepts proofs of the form `valid:<subject>:<email>`; anything else is
/// rejected the way a real provider rejects a forged token.
pub struct FakeProvider(pub Provider);

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn provider(&self) -> Provider {
        self.0
    }

    async fn verify(&self, credential: Credential<'_>) -> Result<VerifiedSubject, AuthError> {
        let mut parts = credential.id_token(self.0)?.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("valid"), Some(subject), Some(email)) => Ok(VerifiedSubject {
                subject_id: subject.to_string(),
                email: email.to_string(),
            }),
            _ => Err(AuthError::provider("signature check failed")),
        }
    }
}

/// `valid:<subject>:<email>` proof for [`FakeProvider`].
pub fn proof(subject: &str, email: &str) -> String {
    format!("valid:{subject}:{email}")
}
