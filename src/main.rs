use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use std::sync::Arc;
use tracing::{error, info};
use trip_planner::application::auth_service::AuthService;
use trip_planner::data::user_repository::InMemoryUserRepository;
use trip_planner::infrastructure::config::AppConfig;
use trip_planner::infrastructure::logging::init_logging;
use trip_planner::presentation::handlers::AppState;
use trip_planner::presentation::middleware::{RequestIdMiddleware, TimingMiddleware};
use trip_planner::presentation::routes::{ROUTES, configure};

fn cors(origin: Option<&str>) -> Cors {
    match origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .max_age(3600),
        None => Cors::permissive(),
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            return Err(std::io::Error::other(e));
        }
    };

    init_logging(&config.log_level);
    info!(
        ttl_secs = config.token_ttl_secs,
        cors_origin = ?config.cors_origin,
        "Configuration loaded"
    );

    let auth_service = Arc::new(AuthService::new(
        Arc::new(InMemoryUserRepository::new()),
        config.jwt_secret.clone(),
        config.token_ttl_secs,
    ));
    let state = web::Data::new(AppState::in_memory(auth_service.clone()));
    info!("Application state initialized");

    let cors_origin = config.cors_origin.clone();
    let server = HttpServer::new(move || {
        let auth_service = auth_service.clone();
        App::new()
            .app_data(state.clone())
            .configure(|cfg| configure(cfg, auth_service))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(cors(cors_origin.as_deref()))
    });

    let bind_addr = config.bind_addr();
    let server = server.bind(&bind_addr).map_err(|e| {
        error!(address = %bind_addr, error = %e, "Failed to bind");
        e
    })?;

    info!(address = %bind_addr, routes = %ROUTES, "Starting HTTP server");
    server.run().await
}
