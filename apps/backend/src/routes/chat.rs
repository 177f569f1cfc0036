//! Matches, reports and blocks.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use super::{authorize, granted};
use crate::auth::{RequestIds, RouteId};
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::middleware::{throttle_if, JwtExtract, ThrottlePolicy};
use crate::repos::{Block, Match, Report};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub user_id1: Option<String>,
    pub user_id2: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub reporter_id: Option<String>,
    pub reported_user_id: Option<String>,
    pub reason: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRequest {
    pub user_id: Option<String>,
    pub blocked_user_id: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct MatchResponse {
    success: bool,
    #[serde(rename = "match")]
    matched: Match,
    created: bool,
}

#[derive(Debug, Serialize)]
struct ReportResponse {
    success: bool,
    message: &'static str,
    report: Report,
}

#[derive(Debug, Serialize)]
struct BlockResponse {
    success: bool,
    block: Block,
}

#[derive(Debug, Serialize)]
struct BlockListResponse {
    success: bool,
    count: usize,
    blocks: Vec<Block>,
}

async fn create_match(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    body: ValidatedJson<MatchRequest>,
) -> Result<HttpResponse, AppError> {
    let ids = RequestIds::new()
        .with_body("userId1", body.user_id1.as_deref())
        .with_body("userId2", body.user_id2.as_deref());
    let access = authorize(&state, &req, RouteId::MatchCreate, &user, &ids)?;
    let other = granted(access.counterparty, "counterparty")?;

    let (matched, created) = state
        .matches
        .create(user.user_id().as_str(), other.as_str())
        .await?;
    let response = MatchResponse {
        success: true,
        matched,
        created,
    };
    Ok(if created {
        HttpResponse::Created().json(response)
    } else {
        HttpResponse::Ok().json(response)
    })
}

async fn create_report(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    body: ValidatedJson<ReportRequest>,
) -> Result<HttpResponse, AppError> {
    let ids = RequestIds::new()
        .with_body("reporterId", body.reporter_id.as_deref())
        .with_body("reportedUserId", body.reported_user_id.as_deref());
    let access = authorize(&state, &req, RouteId::ReportCreate, &user, &ids)?;
    let reported = granted(access.counterparty, "counterparty")?;

    let report = state
        .safety
        .report(
            user.user_id().as_str(),
            reported.as_str(),
            body.reason.as_deref(),
            body.details.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Created().json(ReportResponse {
        success: true,
        message: "Report submitted",
        report,
    }))
}

async fn create_block(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    body: ValidatedJson<BlockRequest>,
) -> Result<HttpResponse, AppError> {
    let ids = RequestIds::new()
        .with_body("userId", body.user_id.as_deref())
        .with_body("blockedUserId", body.blocked_user_id.as_deref());
    let access = authorize(&state, &req, RouteId::BlockCreate, &user, &ids)?;
    let blocked = granted(access.counterparty, "counterparty")?;

    let block = state
        .safety
        .block(user.user_id().as_str(), blocked.as_str(), body.reason.as_deref())
        .await?;
    Ok(HttpResponse::Created().json(BlockResponse {
        success: true,
        block,
    }))
}

async fn list_blocks(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let ids = RequestIds::new().with_path("userId", path.as_str());
    authorize(&state, &req, RouteId::BlockList, &user, &ids)?;
    let blocks = state.safety.blocks(user.user_id().as_str()).await?;
    Ok(HttpResponse::Ok().json(BlockListResponse {
        success: true,
        count: blocks.len(),
        blocks,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    let on = state.rate_limit_enabled;
    let backend = &state.throttle_backend;

    cfg.service(
        web::resource("/matches")
            .wrap(throttle_if(on, backend, ThrottlePolicy::MATCHES))
            .wrap(JwtExtract)
            .route(web::post().to(create_match)),
    );
    cfg.service(
        web::resource("/reports")
            .wrap(throttle_if(on, backend, ThrottlePolicy::REPORTS))
            .wrap(JwtExtract)
            .route(web::post().to(create_report)),
    );
    cfg.service(
        web::scope("/blocks")
            .wrap(throttle_if(on, backend, ThrottlePolicy::GENERAL))
            .wrap(JwtExtract)
            .route("", web::post().to(create_block))
            .route("/{userId}", web::get().to(list_blocks)),
    );
}
