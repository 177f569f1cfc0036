use actix_web::{web, App, HttpServer};
use dating_backend::config::Config;
use dating_backend::infra::state::StateBuilder;
use dating_backend::middleware::{
    cors_middleware, RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan,
};
use dating_backend::routes;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Configuration problems (a missing JWT_SECRET above all) stop the
    // process before anything binds.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let state = match StateBuilder::from_config(&config) {
        Ok(builder) => builder.build().await,
        Err(e) => Err(e),
    };
    let state = match state {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    info!(
        host = %config.host,
        port = config.port,
        services = %config.service_name(),
        providers = ?state.issuer.providers().enabled(),
        persistent_users = state.db().is_some(),
        "starting dating backend"
    );

    let data = web::Data::new(state);
    let origins = config.cors_allowed_origins.clone();

    HttpServer::new(move || {
        let data = data.clone();
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(SecurityHeaders)
            .wrap(cors_middleware(&origins))
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(|cfg| routes::configure(cfg, &data))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
