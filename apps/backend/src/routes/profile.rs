//! Profile routes: `/profile`, `/profile/{userId}`, `/profiles/discover`.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use super::{authorize, granted};
use crate::auth::{RequestIds, RouteId};
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::middleware::{throttle_if, JwtExtract, ThrottlePolicy};
use crate::repos::Profile;
use crate::services::ProfilePayload;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    success: bool,
    profile: Profile,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_own_profile: Option<bool>,
}

#[derive(Debug, Serialize)]
struct DiscoverResponse {
    success: bool,
    count: usize,
    profiles: Vec<Profile>,
}

fn profile_body(profile: Profile, is_own_profile: Option<bool>) -> ProfileResponse {
    ProfileResponse {
        success: true,
        profile,
        is_own_profile,
    }
}

/// The owner is always the token subject; any `userId` in the body is ignored.
async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    body: ValidatedJson<ProfilePayload>,
) -> Result<HttpResponse, AppError> {
    authorize(&state, &req, RouteId::ProfileCreate, &user, &RequestIds::new())?;
    let profile = state
        .profiles
        .create(user.user_id().as_str(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(profile_body(profile, None)))
}

async fn read(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let ids = RequestIds::new().with_path("userId", path.as_str());
    let access = authorize(&state, &req, RouteId::ProfileRead, &user, &ids)?;
    let target = granted(access.target, "profile owner")?;
    let profile = state.profiles.get(target.as_str()).await?;
    Ok(HttpResponse::Ok().json(profile_body(profile, Some(access.is_self))))
}

async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
    body: ValidatedJson<ProfilePayload>,
) -> Result<HttpResponse, AppError> {
    let ids = RequestIds::new().with_path("userId", path.as_str());
    authorize(&state, &req, RouteId::ProfileUpdate, &user, &ids)?;
    let profile = state
        .profiles
        .update(user.user_id().as_str(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile_body(profile, None)))
}

async fn delete(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let ids = RequestIds::new().with_path("userId", path.as_str());
    authorize(&state, &req, RouteId::ProfileDelete, &user, &ids)?;
    state.profiles.delete(user.user_id().as_str()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Profile deleted",
    })))
}

async fn discover(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse, AppError> {
    authorize(&state, &req, RouteId::ProfileDiscover, &user, &RequestIds::new())?;
    let profiles = state.profiles.discover(user.user_id().as_str()).await?;
    Ok(HttpResponse::Ok().json(DiscoverResponse {
        success: true,
        count: profiles.len(),
        profiles,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    let on = state.rate_limit_enabled;
    let backend = &state.throttle_backend;

    cfg.service(
        web::scope("/profile")
            .wrap(throttle_if(on, backend, ThrottlePolicy::GENERAL))
            .wrap(JwtExtract)
            .service(
                web::resource("")
                    .wrap(throttle_if(on, backend, ThrottlePolicy::PROFILE_CREATE))
                    .route(web::post().to(create)),
            )
            .service(
                web::resource("/{userId}")
                    .route(web::get().to(read))
                    .route(web::put().to(update))
                    .route(web::delete().to(delete)),
            ),
    );
    cfg.service(
        web::scope("/profiles")
            .wrap(throttle_if(on, backend, ThrottlePolicy::DISCOVERY))
            .wrap(JwtExtract)
            .route("/discover", web::get().to(discover)),
    );
}
