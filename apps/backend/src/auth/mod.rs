//! Authentication and authorization core.
//!
//! - [`issuer`] turns a provider-verified identity into a signed token.
//! - [`verifier`] checks a bearer token statelessly on every request.
//! - [`gate`] applies the per-route ownership policy.
//!
//! None of these modules know about HTTP beyond header parsing; the web layer
//! maps [`AuthError`] to responses.

pub mod claims;
pub mod email;
pub mod error;
pub mod gate;
pub mod issuer;
pub mod jwt;
pub mod verifier;

pub use claims::{IdentityClaims, Provider, UserId};
pub use error::AuthError;
pub use gate::{Access, AuthorizationGate, RequestIds, RouteId};
pub use issuer::{IssueError, IssuedToken, TokenIssuer};
pub use verifier::TokenVerifier;
