use actix_web::{web, HttpRequest};

use crate::auth::error::AuthError;
use crate::auth::{Access, RequestIds, RouteId, UserId};
use crate::config::ServiceGroup;
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::logging::security;
use crate::state::app_state::AppState;

pub mod auth;
pub mod chat;
pub mod health;
pub mod profile;

/// Mount `/health` plus every route group `state` is configured to serve.
///
/// Throttling and bearer extraction are wired per scope here, so tests and
/// `main` get the same pipeline.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    health::configure_routes(cfg);

    if state.serves(ServiceGroup::Auth) {
        auth::configure_routes(cfg, state);
    }
    if state.serves(ServiceGroup::Profile) {
        profile::configure_routes(cfg, state);
    }
    if state.serves(ServiceGroup::Chat) {
        chat::configure_routes(cfg, state);
    }
}

/// Run the gate for `route`, logging ownership denials.
pub(crate) fn authorize(
    state: &AppState,
    req: &HttpRequest,
    route: RouteId,
    user: &CurrentUser,
    ids: &RequestIds<'_>,
) -> Result<Access, AppError> {
    state
        .gate
        .authorize(route, Some(user.user_id()), ids)
        .map_err(|e| {
            if matches!(e, AuthError::Forbidden(_)) {
                security::forbidden(user.user_id().as_str(), req.path());
            }
            AppError::from(e)
        })
}

/// Parsed id the route's policy guarantees; absent only if the table is wrong.
pub(crate) fn granted(id: Option<UserId>, what: &str) -> Result<UserId, AppError> {
    id.ok_or_else(|| AppError::internal(format!("route policy yields no {what}")))
}

/// Non-blank body field or `400 MISSING_FIELD`.
pub(crate) fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::missing_field(field))
}
