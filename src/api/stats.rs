//! Statistics endpoints: popularity ranking and summary counts

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::ranking::{Month, RankingEntry, RankingPeriod},
    services::stats::Overview,
};

/// Ranking query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct RankingQuery {
    /// Aggregation window (`monthly` or `all-time`; default monthly)
    #[serde(default)]
    pub period: RankingPeriod,
    /// Month to rank (`YYYY-MM`); defaults to the current month
    pub month: Option<String>,
}

/// Popularity ranking
#[utoipa::path(
    get,
    path = "/ranking",
    tag = "stats",
    params(RankingQuery),
    responses(
        (status = 200, description = "Items ranked by borrow count", body = Vec<RankingEntry>),
        (status = 400, description = "Invalid month")
    )
)]
pub async fn get_ranking(
    State(state): State<crate::AppState>,
    Query(query): Query<RankingQuery>,
) -> AppResult<Json<Vec<RankingEntry>>> {
    let month = query.month.as_deref().map(Month::parse).transpose()?;
    let entries = state.services.stats.ranking(query.period, month).await?;
    Ok(Json(entries))
}

/// Summary statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Catalog and ledger summary counts", body = Overview)
    )
)]
pub async fn get_stats(State(state): State<crate::AppState>) -> AppResult<Json<Overview>> {
    let overview = state.services.stats.overview().await?;
    Ok(Json(overview))
}
