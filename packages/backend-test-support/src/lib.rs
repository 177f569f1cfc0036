//! Backend test support utilities
//!
//! Shared helpers for the backend's unit and integration tests: unified logging
//! initialization, assertions for the JSON error contract, and generators for
//! unique provider subjects and email addresses.

pub mod error_body;
pub mod logging;
pub mod unique_helpers;
