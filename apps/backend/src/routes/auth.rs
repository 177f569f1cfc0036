//! Sign-in and token inspection: `/auth/*`.

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use super::{authorize, required};
use crate::auth::error::AuthError;
use crate::auth::{IdentityClaims, IssueError, Provider, RequestIds, RouteId, UserId};
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::logging::security;
use crate::middleware::{throttle_if, ThrottlePolicy};
use crate::providers::Credential;
use crate::repos::UserRecord;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSignIn {
    pub id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppleSignIn {
    pub identity_token: Option<String>,
}

#[derive(Deserialize)]
pub struct EmailSignIn {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    success: bool,
    token: String,
    user_id: UserId,
    provider: Provider,
}

#[derive(Debug, Serialize)]
struct VerifyResponse {
    success: bool,
    decoded: IdentityClaims,
}

#[derive(Debug, Serialize)]
struct MeResponse {
    success: bool,
    user: UserRecord,
}

async fn sign_in(
    state: &AppState,
    req: &HttpRequest,
    provider: Provider,
    credential: Credential<'_>,
) -> Result<HttpResponse, AppError> {
    let issued = state
        .issuer
        .issue(provider, credential)
        .await
        .inspect_err(|e| {
            if let IssueError::Auth(auth) = e {
                if auth.is_authentication_failure() {
                    security::auth_failed(auth, req.path());
                }
            }
        })?;

    Ok(HttpResponse::Ok().json(SignInResponse {
        success: true,
        token: issued.token,
        user_id: issued.user_id,
        provider: issued.provider,
    }))
}

fn email_and_password(body: EmailSignIn) -> Result<(String, String), AppError> {
    let email = required(body.email, "email")?;
    // Passwords are taken verbatim; only an absent or empty one is missing.
    let password = body
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::missing_field("password"))?;
    Ok((email, password))
}

async fn google(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: ValidatedJson<GoogleSignIn>,
) -> Result<HttpResponse, AppError> {
    let id_token = required(body.into_inner().id_token, "idToken")?;
    sign_in(&state, &req, Provider::Google, Credential::IdToken(&id_token)).await
}

async fn apple(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: ValidatedJson<AppleSignIn>,
) -> Result<HttpResponse, AppError> {
    let identity_token = required(body.into_inner().identity_token, "identityToken")?;
    sign_in(&state, &req, Provider::Apple, Credential::IdToken(&identity_token)).await
}

async fn email_login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: ValidatedJson<EmailSignIn>,
) -> Result<HttpResponse, AppError> {
    let (email, password) = email_and_password(body.into_inner())?;
    let credential = Credential::Password {
        email: &email,
        password: &password,
    };
    sign_in(&state, &req, Provider::Email, credential).await
}

/// Create an email account and sign it in. Answers 201 with the same body as
/// a sign-in.
async fn email_register(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: ValidatedJson<EmailSignIn>,
) -> Result<HttpResponse, AppError> {
    let accounts = state.email_accounts.as_ref().ok_or_else(|| {
        let e = AuthError::provider("email sign-in is not enabled");
        security::auth_failed(&e, req.path());
        AppError::from(e)
    })?;
    let (email, password) = email_and_password(body.into_inner())?;
    accounts.register(&email, &password).await?;

    let credential = Credential::Password {
        email: &email,
        password: &password,
    };
    let mut response = sign_in(&state, &req, Provider::Email, credential).await?;
    *response.status_mut() = StatusCode::CREATED;
    Ok(response)
}

/// Decode a token handed over in the body rather than the header.
async fn verify(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: ValidatedJson<VerifyRequest>,
) -> Result<HttpResponse, AppError> {
    let claims = body
        .into_inner()
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or(AuthError::MissingToken)
        .and_then(|token| state.verifier.verify(token.trim()))
        .inspect_err(|e| security::auth_failed(e, req.path()))?;

    Ok(HttpResponse::Ok().json(VerifyResponse {
        success: true,
        decoded: claims,
    }))
}

async fn me(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, AppError> {
    authorize(&state, &req, RouteId::AuthMe, &user, &RequestIds::new())?;
    let record = state.users.get_user(user.user_id()).await?;
    Ok(HttpResponse::Ok().json(MeResponse {
        success: true,
        user: record,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.service(
        web::scope("/auth")
            .wrap(throttle_if(
                state.rate_limit_enabled,
                &state.throttle_backend,
                ThrottlePolicy::AUTH,
            ))
            .route("/google", web::post().to(google))
            .route("/apple", web::post().to(apple))
            .route("/email/register", web::post().to(email_register))
            .route("/email/login", web::post().to(email_login))
            .route("/verify", web::post().to(verify))
            .route("/me", web::get().to(me)),
    );
}
