//! Item (catalog) endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::item::{Item, ItemQuery},
    services::catalog::ItemDetails,
};

/// List items with search and type filter
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(
        ("type" = Option<String>, Query, description = "Filter by item type (book, thesis, all)"),
        ("query" = Option<String>, Query, description = "Substring search over title, author, ISBN, barcode")
    ),
    responses(
        (status = 200, description = "List of items", body = Vec<Item>)
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    Query(query): Query<ItemQuery>,
) -> AppResult<Json<Vec<Item>>> {
    let items = state.services.catalog.search_items(&query).await?;
    Ok(Json(items))
}

/// Get item details plus its full borrowing history
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = String, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item with borrowing history", body = ItemDetails),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ItemDetails>> {
    let details = state.services.catalog.get_item(&id).await?;
    Ok(Json(details))
}
