//! OpenAPI documentation

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::api::{health, items, loans, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LibLend API",
        version = "0.3.0",
        description = "Library & Thesis Lending Management REST API",
        license(name = "MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Items
        items::list_items,
        items::get_item,
        // Lending
        loans::borrow_item,
        loans::return_item,
        loans::get_history,
        // Stats
        stats::get_ranking,
        stats::get_stats,
    ),
    components(
        schemas(
            // Items
            crate::models::item::Item,
            crate::models::item::ItemType,
            crate::models::item::ItemTypeFilter,
            crate::services::catalog::ItemDetails,
            // Lending
            loans::BorrowRequest,
            loans::ReturnRequest,
            crate::models::loan::BorrowingRecord,
            // Stats
            crate::models::ranking::RankingEntry,
            crate::models::ranking::RankingPeriod,
            crate::services::stats::Overview,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "items", description = "Catalog search and item details"),
        (name = "lending", description = "Borrow, return, and history"),
        (name = "stats", description = "Rankings and summary statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router (JSON document only)
pub fn create_openapi_router() -> Router {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
