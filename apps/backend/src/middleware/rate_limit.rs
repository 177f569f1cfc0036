//! Request throttling policies.
//!
//! Each route group gets its own [`ThrottlePolicy`]. Counters live in one
//! shared [`InMemoryBackend`] and are keyed by policy name plus the
//! authenticated user id, falling back to the client IP for anonymous
//! requests. Exceeding a limit yields 429 with `x-ratelimit-*` headers.

use std::future::{ready, Ready};
use std::time::Duration;

use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use actix_extensible_rate_limit::backend::{SimpleInput, SimpleOutput};
use actix_extensible_rate_limit::RateLimiter;
use actix_web::dev::ServiceRequest;
use actix_web::middleware::Condition;
use actix_web::HttpMessage;

use crate::auth::claims::IdentityClaims;

const FIFTEEN_MINUTES: Duration = Duration::from_secs(15 * 60);
const ONE_DAY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    pub name: &'static str,
    pub window: Duration,
    pub max_requests: u64,
}

impl ThrottlePolicy {
    /// Sign-in and token checks.
    pub const AUTH: Self = Self::new("auth", FIFTEEN_MINUTES, 10);
    pub const GENERAL: Self = Self::new("general", FIFTEEN_MINUTES, 100);
    pub const DISCOVERY: Self = Self::new("discovery", FIFTEEN_MINUTES, 200);
    pub const PROFILE_CREATE: Self = Self::new("profile_create", ONE_DAY, 5);
    pub const MATCHES: Self = Self::new("matches", FIFTEEN_MINUTES, 15);
    pub const REPORTS: Self = Self::new("reports", ONE_DAY, 10);

    pub const fn new(name: &'static str, window: Duration, max_requests: u64) -> Self {
        Self {
            name,
            window,
            max_requests,
        }
    }
}

/// Counter key for `req` under `policy`.
pub fn throttle_key(policy: &ThrottlePolicy, req: &ServiceRequest) -> String {
    if let Some(claims) = req.extensions().get::<IdentityClaims>() {
        return format!("{}:{}", policy.name, claims.user_id);
    }
    let info = req.connection_info();
    let ip = info.realip_remote_addr().unwrap_or("unknown");
    format!("{}:{}", policy.name, ip)
}

/// Build a rate limiter for `policy` on top of the shared `backend`.
///
/// Must be wrapped inside `JwtExtract` for user keys to apply.
pub fn throttle(
    backend: &InMemoryBackend,
    policy: ThrottlePolicy,
) -> RateLimiter<
    InMemoryBackend,
    SimpleOutput,
    impl Fn(&ServiceRequest) -> Ready<Result<SimpleInput, actix_web::Error>> + 'static,
> {
    let input = move |req: &ServiceRequest| {
        ready(Ok::<_, actix_web::Error>(SimpleInput {
            interval: policy.window,
            max_requests: policy.max_requests,
            key: throttle_key(&policy, req),
        }))
    };
    RateLimiter::builder(backend.clone(), input)
        .add_headers()
        .build()
}

/// [`throttle`], switched off entirely when `enabled` is false.
pub fn throttle_if(
    enabled: bool,
    backend: &InMemoryBackend,
    policy: ThrottlePolicy,
) -> Condition<
    RateLimiter<
        InMemoryBackend,
        SimpleOutput,
        impl Fn(&ServiceRequest) -> Ready<Result<SimpleInput, actix_web::Error>> + 'static,
    >,
> {
    Condition::new(enabled, throttle(backend, policy))
}
