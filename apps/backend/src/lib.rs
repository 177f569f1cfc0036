#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod providers;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::{
    AuthError, AuthorizationGate, IdentityClaims, Provider, RouteId, TokenIssuer, TokenVerifier,
    UserId,
};
pub use config::Config;
pub use error::{AppError, ErrorBody};
pub use extractors::{CurrentUser, ValidatedJson};
pub use infra::state::{build_state, StateBuilder};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
