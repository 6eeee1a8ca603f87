//! Lending endpoints: borrow, return, history

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::loan::BorrowingRecord,
};

/// 8-digit student id, same rule the registration desk applies
static STUDENT_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8}$").unwrap());

/// Borrow request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    /// Scanned item barcode
    #[validate(length(min = 1, max = 64, message = "barcode is required"))]
    pub barcode: String,
    /// Borrower's student id (8 digits)
    #[validate(regex(path = *STUDENT_ID_RE, message = "student id must be 8 digits"))]
    pub user_id: String,
    /// Display name for the record; falls back to the student id
    #[serde(default)]
    pub user_name: Option<String>,
}

/// Return request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    /// Scanned item barcode
    #[validate(length(min = 1, max = 64, message = "barcode is required"))]
    pub barcode: String,
}

/// History query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    /// Restrict to one user's history; omit for the full ledger
    pub user_id: Option<String>,
}

/// Borrow an item
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "lending",
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Item borrowed", body = BorrowingRecord),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Unknown barcode"),
        (status = 409, description = "Item already on loan")
    )
)]
pub async fn borrow_item(
    State(state): State<crate::AppState>,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowingRecord>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let record = state
        .services
        .loans
        .borrow(&request.barcode, &request.user_id, request.user_name.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Return a borrowed item
#[utoipa::path(
    post,
    path = "/return",
    tag = "lending",
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Item returned; the closed record", body = BorrowingRecord),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Unknown barcode"),
        (status = 409, description = "Item not on loan")
    )
)]
pub async fn return_item(
    State(state): State<crate::AppState>,
    Json(request): Json<ReturnRequest>,
) -> AppResult<Json<BorrowingRecord>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let record = state.services.loans.return_item(&request.barcode).await?;
    Ok(Json(record))
}

/// Borrowing history, most-recent first
#[utoipa::path(
    get,
    path = "/history",
    tag = "lending",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Borrowing records, most-recent borrow first", body = Vec<BorrowingRecord>)
    )
)]
pub async fn get_history(
    State(state): State<crate::AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<BorrowingRecord>>> {
    let records = state
        .services
        .loans
        .history(query.user_id.as_deref())
        .await?;
    Ok(Json(records))
}
