//! Property tests for the token issuer and verifier.

use std::sync::Arc;
use std::time::SystemTime;

use dating_backend::adapters::memory::MemoryUserStore;
use dating_backend::auth::error::AuthError;
use dating_backend::auth::{Provider, TokenIssuer, TokenVerifier};
use dating_backend::providers::{Credential, ProviderRegistry};
use dating_backend::state::security_config::SecurityConfig;
use proptest::prelude::*;

use crate::support::fake_provider::{proof, FakeProvider};

fn issuer() -> TokenIssuer {
    let providers = ProviderRegistry::new()
        .with(Arc::new(FakeProvider(Provider::Google)))
        .with(Arc::new(FakeProvider(Provider::Apple)));
    TokenIssuer::new(
        SecurityConfig::for_tests(),
        providers,
        Arc::new(MemoryUserStore::new()),
    )
}

fn issue(provider: Provider, subject: &str, email: &str) -> String {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    runtime
        .block_on(issuer().issue_at(
            provider,
            Credential::IdToken(&proof(subject, email)),
            SystemTime::now(),
        ))
        .unwrap()
        .token
}

fn provider_strategy() -> impl Strategy<Value = Provider> {
    prop_oneof![Just(Provider::Google), Just(Provider::Apple)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn issued_tokens_round_trip(
        provider in provider_strategy(),
        subject in "[A-Za-z0-9._-]{1,40}",
        local in "[a-z0-9]{1,12}",
        domain in "[a-z]{2,10}",
    ) {
        let email = format!("{local}@{domain}.com");
        let token = issue(provider, &subject, &email);

        let claims = TokenVerifier::new(SecurityConfig::for_tests()).verify(&token).unwrap();
        prop_assert_eq!(claims.user_id.as_str(), format!("{}_{}", provider.as_str(), subject));
        prop_assert_eq!(claims.provider, provider);
        prop_assert_eq!(claims.email, email);
    }

    #[test]
    fn any_payload_byte_change_breaks_the_signature(
        subject in "[0-9]{1,12}",
        position in any::<prop::sample::Index>(),
        replacement in "[A-Za-z0-9_-]",
    ) {
        let token = issue(Provider::Google, &subject, "alice@example.com");
        let parts: Vec<&str> = token.split('.').collect();
        prop_assert_eq!(parts.len(), 3);

        let mut payload: Vec<char> = parts[1].chars().collect();
        let index = position.index(payload.len());
        let new_char = replacement.chars().next().unwrap();
        prop_assume!(payload[index] != new_char);
        payload[index] = new_char;

        let tampered = format!("{}.{}.{}", parts[0], payload.into_iter().collect::<String>(), parts[2]);
        let err = TokenVerifier::new(SecurityConfig::for_tests()).verify(&tampered).unwrap_err();
        prop_assert_eq!(err, AuthError::InvalidSignature);
    }
}
