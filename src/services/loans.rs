//! Loan management service

use crate::{error::AppResult, models::loan::BorrowingRecord, repository::Repository};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow an item. `user_name` is denormalized into the record for
    /// display; when the caller only knows the id, the id stands in.
    pub async fn borrow(
        &self,
        barcode: &str,
        user_id: &str,
        user_name: Option<&str>,
    ) -> AppResult<BorrowingRecord> {
        let user_name = user_name.filter(|n| !n.trim().is_empty()).unwrap_or(user_id);
        self.repository.ledger.borrow(barcode, user_id, user_name).await
    }

    /// Return a borrowed item
    pub async fn return_item(&self, barcode: &str) -> AppResult<BorrowingRecord> {
        self.repository.ledger.return_item(barcode).await
    }

    /// Borrowing history, optionally scoped to one user
    pub async fn history(&self, user_id: Option<&str>) -> AppResult<Vec<BorrowingRecord>> {
        self.repository.ledger.history(user_id).await
    }
}
