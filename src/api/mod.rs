//! API handlers for the LibLend REST endpoints

pub mod health;
pub mod items;
pub mod loans;
pub mod openapi;
pub mod stats;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Items (catalog)
        .route("/items", get(items::list_items))
        .route("/items/:id", get(items::get_item))
        // Lending
        .route("/borrow", post(loans::borrow_item))
        .route("/return", post(loans::return_item))
        .route("/history", get(loans::get_history))
        // Statistics
        .route("/ranking", get(stats::get_ranking))
        .route("/stats", get(stats::get_stats))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
