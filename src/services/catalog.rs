//! Catalog service: read-only views over the item set

use crate::{
    error::AppResult,
    models::{
        item::{Item, ItemQuery},
        loan::BorrowingRecord,
    },
    repository::Repository,
};

/// Item plus its full borrowing history
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub item: Item,
    pub borrow_history: Vec<BorrowingRecord>,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search items with filters
    pub async fn search_items(&self, query: &ItemQuery) -> AppResult<Vec<Item>> {
        self.repository.catalog.search(query).await
    }

    /// Get an item with its full borrowing history
    pub async fn get_item(&self, id: &str) -> AppResult<ItemDetails> {
        let item = self.repository.catalog.get_by_id(id).await?;
        let borrow_history = self.repository.ledger.history_for_item(id).await?;
        Ok(ItemDetails {
            item,
            borrow_history,
        })
    }
}
