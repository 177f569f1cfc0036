//! Security event logging.

use tracing::warn;

use crate::auth::error::AuthError;
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// A request failed authentication.
pub fn auth_failed(error: &AuthError, path: &str) {
    let trace_id = trace_ctx::trace_id();
    let detail = error.to_string();

    warn!(
        event = "SECURITY_AUTH_FAILED",
        %trace_id,
        code = error.code().as_str(),
        path,
        detail = %Redacted(&detail),
        "Authentication failure"
    );
}

/// An authenticated user was denied by the ownership policy.
pub fn forbidden(actor: &str, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_FORBIDDEN",
        %trace_id,
        actor,
        path,
        "Authorization denied"
    );
}
