use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse<'a> {
    status: &'static str,
    service: &'a str,
    version: &'static str,
}

async fn health(app_state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        service: &app_state.service_name,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
