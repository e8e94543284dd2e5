//! HTTP REST API routes

mod character_routes;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Catalog
        .route("/api/catalog", get(character_routes::get_catalog))
        // Character sheet
        .route("/api/character", get(character_routes::get_character))
        .route("/api/character/sync", get(character_routes::get_sync_status))
        .route(
            "/api/character/attributes/{name}",
            post(character_routes::adjust_attribute),
        )
        .route(
            "/api/character/skills/{name}",
            post(character_routes::adjust_skill),
        )
        .route("/api/character/class", put(character_routes::select_class))
        .route(
            "/api/character/skill-checks",
            post(character_routes::roll_skill_check),
        )
}

/// Full application router with health check and middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
