use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use fast_budget_api::application::auth_service::AuthService;
use fast_budget_api::application::expense_service::ExpenseService;
use fast_budget_api::data::expense_repository::InMemoryExpenseRepository;
use fast_budget_api::data::user_repository::InMemoryUserRepository;
use fast_budget_api::infrastructure::config::AppConfig;
use fast_budget_api::infrastructure::logging::init_logging;
use fast_budget_api::infrastructure::mailer::build_notifier;
use fast_budget_api::presentation::handlers::AppState;
use fast_budget_api::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use fast_budget_api::presentation::routes;
use std::sync::Arc;
use tracing::{error, info};

fn cors(origins: &[String]) -> Cors {
    if origins.is_empty() {
        return Cors::permissive();
    }
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging("info");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        std::io::Error::other(e.to_string())
    })?;
    info!(environment = %config.environment, "Configuration loaded");

    let notifier = build_notifier(&config).map_err(|e| {
        error!(error = %e, "Failed to set up mail transport");
        std::io::Error::other(e.to_string())
    })?;
    if config.smtp.is_none() {
        info!("SMTP not configured; OTPs will be written to the log");
    }

    let user_repository = Arc::new(InMemoryUserRepository::new());
    let expense_repository = Arc::new(InMemoryExpenseRepository::new());

    let state = web::Data::new(AppState {
        auth_service: AuthService::new(user_repository, notifier, config.jwt_secret.clone())
            .with_token_ttl(config.jwt_ttl_secs),
        expense_service: ExpenseService::new(expense_repository),
    });
    info!("Application state initialized");

    let jwt_secret = config.jwt_secret.clone();
    let cors_origins = config.cors_origins.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(cors(&cors_origins))
            .configure(routes::configure)
    });

    let bind_addr = format!("{}:{}", config.host, config.port);
    let server = server.bind((config.host.as_str(), config.port))?;
    info!(address = %bind_addr, "Starting HTTP server");
    server.run().await
}
