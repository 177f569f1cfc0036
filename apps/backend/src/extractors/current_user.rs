use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};

use crate::auth::claims::{IdentityClaims, UserId};
use crate::auth::error::AuthError;
use crate::error::AppError;
use crate::logging::security;
use crate::state::app_state::AppState;

/// The authenticated caller.
///
/// Uses the claims `JwtExtract` stored in request extensions; on routes
/// outside a protected scope the `Authorization` header is verified here.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub claims: IdentityClaims,
}

impl CurrentUser {
    pub fn user_id(&self) -> &UserId {
        &self.claims.user_id
    }
}

fn extract(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    if let Some(claims) = req.extensions().get::<IdentityClaims>() {
        return Ok(CurrentUser {
            claims: claims.clone(),
        });
    }

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))?;

    let claims = state
        .verifier
        .verify_headers(req.headers())
        .inspect_err(|e: &AuthError| security::auth_failed(e, req.path()))?;
    req.extensions_mut().insert(claims.clone());
    Ok(CurrentUser { claims })
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}
