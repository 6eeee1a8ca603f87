//! Statistics service: popularity ranking and summary counts

use crate::{
    error::AppResult,
    models::ranking::{Month, RankingEntry, RankingPeriod},
    repository::Repository,
};

/// Summary counts for the dashboard
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct Overview {
    pub total_items: i64,
    pub available_items: i64,
    pub active_loans: i64,
    pub overdue_loans: i64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Popularity ranking for a period
    pub async fn ranking(
        &self,
        period: RankingPeriod,
        month: Option<Month>,
    ) -> AppResult<Vec<RankingEntry>> {
        self.repository.ledger.ranking(period, month).await
    }

    /// Summary counts over the catalog and the ledger
    pub async fn overview(&self) -> AppResult<Overview> {
        let (total_items, available_items) = self
            .repository
            .store
            .read(|s| {
                let total = s.items.len() as i64;
                let available = s.items.values().filter(|i| i.available).count() as i64;
                (total, available)
            })
            .await;

        Ok(Overview {
            total_items,
            available_items,
            active_loans: self.repository.ledger.count_active().await?,
            overdue_loans: self.repository.ledger.count_overdue().await?,
        })
    }
}
