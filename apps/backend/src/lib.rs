pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Build the API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Accounts
        .route("/api/login", post(routes::auth::login))
        .route("/api/register", post(routes::auth::register))
        .route("/api/update_password", post(routes::auth::update_password))
        // Snapshot
        .route("/api/load_data", get(routes::data::load_data))
        // Lessons
        .route("/api/save_lesson", post(routes::lessons::save))
        .route("/api/delete_lesson", post(routes::lessons::delete))
        .route("/api/get_lesson_slides", get(routes::lessons::slides))
        // Modules
        .route("/api/save_module", post(routes::modules::save))
        .route("/api/delete_module", post(routes::modules::delete))
        // Exams
        .route("/api/save_exam", post(routes::exams::save))
        .route("/api/delete_exam", post(routes::exams::delete))
        .route("/api/submit_exam", post(routes::exams::submit))
        // Students
        .route("/api/save_student", post(routes::students::save))
        .route("/api/delete_student", post(routes::students::delete))
        // Timetables
        .route(
            "/api/save_student_schedule",
            post(routes::schedules::save),
        )
        .route(
            "/api/delete_student_schedule",
            post(routes::schedules::delete),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let state = AppState { db: Arc::new(db) };
    let app = build_router(state);

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
