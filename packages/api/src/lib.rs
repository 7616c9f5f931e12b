// ABOUTME: HTTP API layer for Tutor providing REST endpoints and routing
// ABOUTME: Integration layer that depends on all domain packages

use axum::{
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

pub mod auth;
pub mod config_handlers;
pub mod db;
pub mod error;
pub mod instruction_handlers;
pub mod language_handlers;
pub mod provider_handlers;
pub mod settings_handlers;

pub use auth::CurrentUser;
pub use db::{AppState, DbState};
pub use error::ApiError;

/// Creates the configuration operations router: effective-config
/// resolution, snapshot export/import, and instruction generation
pub fn create_config_router() -> Router<AppState> {
    Router::new()
        .route("/public-config", get(config_handlers::public_config))
        .route("/export-config", get(config_handlers::export_config))
        .route("/import-config", post(config_handlers::import_config))
        .route(
            "/generate-instruction",
            post(instruction_handlers::generate_instruction),
        )
}

/// Creates the languages CRUD router
pub fn create_languages_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(language_handlers::list_languages).post(language_handlers::create_language),
        )
        .route(
            "/{id}",
            put(language_handlers::update_language).delete(language_handlers::delete_language),
        )
}

/// Creates the AI providers CRUD router
pub fn create_providers_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(provider_handlers::list_providers).post(provider_handlers::create_provider),
        )
        .route(
            "/{id}",
            put(provider_handlers::update_provider).delete(provider_handlers::delete_provider),
        )
}

/// Creates the user settings router
pub fn create_settings_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(settings_handlers::get_settings).put(settings_handlers::update_settings),
    )
}

/// Assembles the full /api router over the application state
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(create_config_router())
                .nest("/languages", create_languages_router())
                .nest("/providers", create_providers_router())
                .nest("/settings", create_settings_router())
                .route("/health", get(health_check)),
        )
        .with_state(state)
}

/// Health check endpoint (unauthenticated)
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Request logging middleware: method, path, status, latency
pub async fn request_logger(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = std::time::Instant::now();
    let response = next.run(req).await;
    let duration = start.elapsed();
    tracing::info!(
        "{} {} - status: {}, latency: {}ms",
        method,
        uri,
        response.status(),
        duration.as_millis()
    );
    response
}
