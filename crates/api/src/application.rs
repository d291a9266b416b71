use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};

use contest_hub_domain::config::{ApiConfig, ConfigError};
use contest_hub_domain::services::telemetry::{init_telemetry, TelemetryConfig, TelemetryError};
use contest_hub_gateway::{HttpCheckoutGateway, HttpIdentityProvider};
use contest_hub_storage::SeaOrmStorage;
use thiserror::Error;

use crate::handlers::{
    confirmed_contests_handler, contest_detail_handler, create_checkout_session_handler,
    create_contest_handler, delete_contest_handler, health_handler, list_contests_handler,
    list_payments_handler, list_tasks_handler, list_users_handler, metrics_handler,
    payment_confirmation_handler, register_user_handler, submit_task_handler,
    update_contest_handler, update_contest_status_handler, update_user_role_handler,
    update_winner_handler,
};
use crate::state::AppState;

pub async fn run() -> Result<(), BootstrapError> {
    let config = ApiConfig::load_from_env()?;

    let telemetry_config = TelemetryConfig::from_env("API");
    let telemetry = init_telemetry(&telemetry_config)?;

    let storage = SeaOrmStorage::builder()
        .database_url(config.database_url())
        .build()
        .await?;

    let gateway = Arc::new(HttpCheckoutGateway::new(
        config.gateway_base_url(),
        config.gateway_secret_key(),
    ));
    let identity = Arc::new(HttpIdentityProvider::new(config.identity_verify_url()));

    let state = AppState::new(storage, gateway, identity, telemetry, config.client_origin());

    let app_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(Logger::default())
            .route("/", web::get().to(health_handler))
            .route("/contests", web::post().to(create_contest_handler))
            .route("/contests", web::get().to(list_contests_handler))
            // Registered ahead of /contests/{id} so "confirmed" never parses
            // as an id.
            .route(
                "/contests/confirmed",
                web::get().to(confirmed_contests_handler),
            )
            .route("/contests/{id}", web::get().to(contest_detail_handler))
            .route("/contests/{id}", web::patch().to(update_contest_handler))
            .route("/contests/{id}", web::delete().to(delete_contest_handler))
            .route(
                "/contests/{id}/status",
                web::patch().to(update_contest_status_handler),
            )
            .route("/users", web::post().to(register_user_handler))
            .route("/users", web::get().to(list_users_handler))
            .route("/users/{id}", web::patch().to(update_user_role_handler))
            .route("/tasks", web::post().to(submit_task_handler))
            .route("/tasks", web::get().to(list_tasks_handler))
            .route("/tasks/{id}/winner", web::patch().to(update_winner_handler))
            .route(
                "/create-checkout-session",
                web::post().to(create_checkout_session_handler),
            )
            .route(
                "/payment-confirmation",
                web::patch().to(payment_confirmation_handler),
            )
            .route("/payments", web::get().to(list_payments_handler))
            .route("/metrics", web::get().to(metrics_handler))
    })
    .bind(config.api_bind_address())?
    .run()
    .await?;

    Ok(())
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("storage error: {0}")]
    Storage(#[from] contest_hub_domain::storage::StorageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
