//! Ledger repository: the borrow/return state machine, history and
//! ranking queries.
//!
//! Every write runs as one closure under the store's write lock: the
//! item mutation and the record append/close commit together or not at
//! all. Failures return before any mutation.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::BorrowingRecord,
        ranking::{Month, RankingEntry, RankingPeriod},
    },
};

use super::store::MemoryStore;

#[derive(Clone)]
pub struct LedgerRepository {
    store: MemoryStore,
    loan_period: Duration,
}

impl LedgerRepository {
    pub fn new(store: MemoryStore, loan_period_days: i64) -> Self {
        Self {
            store,
            loan_period: Duration::days(loan_period_days),
        }
    }

    /// Borrow an item by barcode, creating one open record and flipping
    /// the item to on-loan in a single atomic step.
    pub async fn borrow(
        &self,
        barcode: &str,
        user_id: &str,
        user_name: &str,
    ) -> AppResult<BorrowingRecord> {
        let loan_period = self.loan_period;
        let barcode = barcode.to_string();
        let user_id = user_id.to_string();
        let user_name = user_name.to_string();

        self.store
            .update(move |state| {
                let item = state
                    .items
                    .values_mut()
                    .find(|i| i.barcode == barcode)
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Item with barcode {} not found", barcode))
                    })?;

                if !item.available {
                    return Err(AppError::AlreadyOnLoan(format!(
                        "Item '{}' is currently on loan",
                        item.title
                    )));
                }

                let now = Utc::now();
                let due_date = now + loan_period;

                item.available = false;
                item.borrowed_by = Some(user_id.clone());
                item.borrowed_at = Some(now);
                item.due_date = Some(due_date);

                let record = BorrowingRecord {
                    id: Uuid::new_v4(),
                    item_id: item.id.clone(),
                    item_title: item.title.clone(),
                    user_id,
                    user_name,
                    borrowed_at: now,
                    due_date,
                    returned_at: None,
                };
                state.records.push(record.clone());

                tracing::info!(
                    item_id = %record.item_id,
                    user_id = %record.user_id,
                    due_date = %record.due_date,
                    "item borrowed"
                );
                Ok(record)
            })
            .await
    }

    /// Return an item by barcode, closing its open record and restoring
    /// availability atomically.
    pub async fn return_item(&self, barcode: &str) -> AppResult<BorrowingRecord> {
        let barcode = barcode.to_string();

        self.store
            .update(move |state| {
                let item = state
                    .items
                    .values_mut()
                    .find(|i| i.barcode == barcode)
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Item with barcode {} not found", barcode))
                    })?;

                if item.available {
                    return Err(AppError::NotOnLoan(format!(
                        "Item '{}' is not on loan",
                        item.title
                    )));
                }
                let item_id = item.id.clone();

                // Atomicity keeps this to at most one open record; if the
                // invariant ever breaks, close the first by record id so
                // the fallback stays deterministic.
                let mut open: Vec<usize> = state
                    .records
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| r.item_id == item_id && r.is_open())
                    .map(|(idx, _)| idx)
                    .collect();
                open.sort_by_key(|&idx| state.records[idx].id);

                let Some(&idx) = open.first() else {
                    // On-loan item without an open record: corrupted
                    // state, surfaced as an internal failure.
                    return Err(AppError::Inconsistency(format!(
                        "item {} is on loan but has no open borrowing record",
                        item_id
                    )));
                };
                if open.len() > 1 {
                    tracing::warn!(
                        item_id = %item_id,
                        open = open.len(),
                        "multiple open records for item; closing first by id"
                    );
                }

                let item = state.items.get_mut(item_id.as_str()).ok_or_else(|| {
                    AppError::Inconsistency(format!("item {} vanished during return", item_id))
                })?;
                item.available = true;
                item.borrowed_by = None;
                item.borrowed_at = None;
                item.due_date = None;

                let record = &mut state.records[idx];
                record.returned_at = Some(Utc::now());

                tracing::info!(
                    item_id = %record.item_id,
                    user_id = %record.user_id,
                    "item returned"
                );
                Ok(record.clone())
            })
            .await
    }

    /// Borrowing history, most-recent borrow first. With a user id the
    /// history is restricted to that user; without one the full ledger
    /// is returned.
    pub async fn history(&self, user_id: Option<&str>) -> AppResult<Vec<BorrowingRecord>> {
        let user_id = user_id.map(str::to_string);
        let records = self
            .store
            .read(|state| {
                let mut records: Vec<_> = state
                    .records
                    .iter()
                    .filter(|r| user_id.as_deref().map_or(true, |u| r.user_id == u))
                    .cloned()
                    .collect();
                records.reverse();
                records
            })
            .await;
        Ok(records)
    }

    /// Full history of one item, most-recent borrow first
    pub async fn history_for_item(&self, item_id: &str) -> AppResult<Vec<BorrowingRecord>> {
        let item_id = item_id.to_string();
        let records = self
            .store
            .read(|state| {
                let mut records: Vec<_> = state
                    .records
                    .iter()
                    .filter(|r| r.item_id == item_id)
                    .cloned()
                    .collect();
                records.reverse();
                records
            })
            .await;
        Ok(records)
    }

    /// Popularity ranking derived from the ledger records. Monthly
    /// rankings count records whose borrow instant falls in `month`;
    /// all-time rankings count everything. Sorted by count descending,
    /// ties broken by item id ascending.
    pub async fn ranking(
        &self,
        period: RankingPeriod,
        month: Option<Month>,
    ) -> AppResult<Vec<RankingEntry>> {
        let month = match period {
            RankingPeriod::Monthly => Some(month.unwrap_or_else(Month::current)),
            RankingPeriod::AllTime => None,
        };

        let entries = self
            .store
            .read(|state| {
                let mut counts: indexmap::IndexMap<&str, i64> = indexmap::IndexMap::new();
                for record in &state.records {
                    if month.map_or(true, |m| m.contains(record.borrowed_at)) {
                        *counts.entry(record.item_id.as_str()).or_insert(0) += 1;
                    }
                }

                let mut entries: Vec<RankingEntry> = counts
                    .into_iter()
                    .filter_map(|(item_id, borrow_count)| {
                        let item = state.items.get(item_id)?;
                        Some(RankingEntry {
                            id: item.id.clone(),
                            title: item.title.clone(),
                            author: item.author.clone(),
                            item_type: item.item_type,
                            borrow_count,
                        })
                    })
                    .collect();

                entries.sort_by(|a, b| {
                    b.borrow_count
                        .cmp(&a.borrow_count)
                        .then_with(|| a.id.cmp(&b.id))
                });
                entries
            })
            .await;

        Ok(entries)
    }

    /// Count open records
    pub async fn count_active(&self) -> AppResult<i64> {
        Ok(self
            .store
            .read(|state| state.records.iter().filter(|r| r.is_open()).count() as i64)
            .await)
    }

    /// Count open records past their due date
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let now = Utc::now();
        Ok(self
            .store
            .read(|state| state.records.iter().filter(|r| r.is_overdue(now)).count() as i64)
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::item::{Item, ItemType};
    use chrono::{DateTime, TimeZone};

    fn item(id: &str, title: &str, barcode: &str, item_type: ItemType) -> Item {
        Item {
            id: id.into(),
            title: title.into(),
            author: "Author".into(),
            item_type,
            barcode: barcode.into(),
            isbn: None,
            location: Some("C-1".into()),
            copies: Some(1),
            available: true,
            borrowed_by: None,
            borrowed_at: None,
            due_date: None,
        }
    }

    fn record_at(
        item_id: &str,
        user_id: &str,
        borrowed_at: DateTime<Utc>,
        returned: bool,
    ) -> BorrowingRecord {
        BorrowingRecord {
            id: Uuid::new_v4(),
            item_id: item_id.into(),
            item_title: format!("title-{item_id}"),
            user_id: user_id.into(),
            user_name: format!("name-{user_id}"),
            borrowed_at,
            due_date: borrowed_at + Duration::days(14),
            returned_at: returned.then(|| borrowed_at + Duration::days(2)),
        }
    }

    async fn ledger_with(items: Vec<Item>, records: Vec<BorrowingRecord>) -> (MemoryStore, LedgerRepository) {
        let store = MemoryStore::new();
        store.load(items, records).await;
        (store.clone(), LedgerRepository::new(store, 14))
    }

    #[tokio::test]
    async fn borrow_then_second_borrow_then_return_then_second_return() {
        let (store, ledger) =
            ledger_with(vec![item("5", "Shelf Routing", "T1", ItemType::Thesis)], vec![]).await;

        // borrow succeeds with a 14-day due date
        let rec = ledger.borrow("T1", "u1", "Alice").await.unwrap();
        assert_eq!(rec.due_date - rec.borrowed_at, Duration::days(14));
        assert!(rec.is_open());

        // item is now on loan with consistent fields
        let on_loan = store
            .read(|s| s.items.get("5").cloned())
            .await
            .unwrap();
        assert!(!on_loan.available);
        assert_eq!(on_loan.borrowed_by.as_deref(), Some("u1"));
        assert!(on_loan.loan_fields_consistent());

        // double-borrow fails and appends nothing
        let err = ledger.borrow("T1", "u2", "Bob").await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyOnLoan(_)));
        assert_eq!(store.read(|s| s.records.len()).await, 1);

        // return closes Alice's record and restores availability
        let closed = ledger.return_item("T1").await.unwrap();
        assert_eq!(closed.id, rec.id);
        assert_eq!(closed.user_id, "u1");
        assert!(closed.returned_at.is_some());

        let back = store.read(|s| s.items.get("5").cloned()).await.unwrap();
        assert!(back.available);
        assert!(back.loan_fields_consistent());

        // second return fails
        let err = ledger.return_item("T1").await.unwrap_err();
        assert!(matches!(err, AppError::NotOnLoan(_)));
    }

    #[tokio::test]
    async fn borrow_round_trip_preserves_metadata() {
        let original = item("1", "Readable Rust", "9781111111111", ItemType::Book);
        let (store, ledger) = ledger_with(vec![original.clone()], vec![]).await;

        ledger.borrow("9781111111111", "u1", "Alice").await.unwrap();
        ledger.return_item("9781111111111").await.unwrap();

        let after = store.read(|s| s.items.get("1").cloned()).await.unwrap();
        assert_eq!(after.title, original.title);
        assert_eq!(after.author, original.author);
        assert_eq!(after.location, original.location);
        assert_eq!(after.copies, original.copies);
        assert_eq!(after.available, original.available);
    }

    #[tokio::test]
    async fn borrow_unknown_barcode_is_not_found() {
        let (store, ledger) = ledger_with(vec![], vec![]).await;
        assert!(matches!(
            ledger.borrow("nope", "u1", "Alice").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            ledger.return_item("nope").await,
            Err(AppError::NotFound(_))
        ));
        // failed operations leave no trace
        assert_eq!(store.read(|s| s.records.len()).await, 0);
    }

    #[tokio::test]
    async fn on_loan_item_without_open_record_is_an_inconsistency() {
        // Corrupted state: item marked on loan, ledger has no open record.
        let now = Utc::now();
        let mut broken = item("9", "Ghost Loan", "B9", ItemType::Book);
        broken.available = false;
        broken.borrowed_by = Some("u1".into());
        broken.borrowed_at = Some(now);
        broken.due_date = Some(now + Duration::days(14));

        let (store, ledger) = ledger_with(vec![broken], vec![]).await;

        let err = ledger.return_item("B9").await.unwrap_err();
        assert!(matches!(err, AppError::Inconsistency(_)));

        // never silently patched: the item stays on loan
        let still = store.read(|s| s.items.get("9").cloned()).await.unwrap();
        assert!(!still.available);
    }

    #[tokio::test]
    async fn availability_matches_open_records() {
        let (store, ledger) = ledger_with(
            vec![
                item("1", "A", "b1", ItemType::Book),
                item("2", "B", "b2", ItemType::Book),
            ],
            vec![],
        )
        .await;

        ledger.borrow("b1", "u1", "Alice").await.unwrap();
        ledger.borrow("b2", "u2", "Bob").await.unwrap();
        ledger.return_item("b2").await.unwrap();

        store
            .read(|s| {
                for it in s.items.values() {
                    let open = s.open_records_for_item(&it.id).count();
                    assert_eq!(it.available, open == 0, "item {}", it.id);
                    assert!(open <= 1, "item {}", it.id);
                }
            })
            .await;
    }

    #[tokio::test]
    async fn history_is_most_recent_first_and_scoped_by_user() {
        let t0 = Utc.with_ymd_and_hms(2025, 2, 15, 13, 10, 0).unwrap();
        let records = vec![
            record_at("1", "u1", t0, true),
            record_at("2", "u2", t0 + Duration::days(5), true),
            record_at("3", "u1", t0 + Duration::days(10), false),
        ];
        let (_, ledger) = ledger_with(vec![], records).await;

        let all = ledger.history(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].item_id, "3");
        assert_eq!(all[2].item_id, "1");

        let u1 = ledger.history(Some("u1")).await.unwrap();
        assert_eq!(u1.len(), 2);
        assert_eq!(u1[0].item_id, "3");
        assert_eq!(u1[1].item_id, "1");
    }

    #[tokio::test]
    async fn monthly_ranking_counts_only_the_selected_month() {
        let march = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let april = Utc.with_ymd_and_hms(2025, 4, 2, 9, 0, 0).unwrap();

        let items = vec![
            item("1", "Readable Rust", "b1", ItemType::Book),
            item("2", "Shelf Routing", "b2", ItemType::Thesis),
        ];
        let records = vec![
            record_at("1", "u1", march, true),
            record_at("1", "u2", april, true),
            record_at("1", "u3", april + Duration::days(3), false),
            record_at("2", "u1", april, true),
        ];
        let (_, ledger) = ledger_with(items, records).await;

        let april_rank = ledger
            .ranking(RankingPeriod::Monthly, Some(Month::parse("2025-04").unwrap()))
            .await
            .unwrap();
        assert_eq!(april_rank.len(), 2);
        assert_eq!((april_rank[0].id.as_str(), april_rank[0].borrow_count), ("1", 2));
        assert_eq!((april_rank[1].id.as_str(), april_rank[1].borrow_count), ("2", 1));

        let march_rank = ledger
            .ranking(RankingPeriod::Monthly, Some(Month::parse("2025-03").unwrap()))
            .await
            .unwrap();
        assert_eq!(march_rank.len(), 1);
        assert_eq!((march_rank[0].id.as_str(), march_rank[0].borrow_count), ("1", 1));

        let all_time = ledger.ranking(RankingPeriod::AllTime, None).await.unwrap();
        assert_eq!(all_time[0].borrow_count, 3);
        assert_eq!(all_time[1].borrow_count, 1);
    }

    #[tokio::test]
    async fn ranking_ties_break_by_item_id_ascending() {
        let t = Utc.with_ymd_and_hms(2025, 4, 2, 9, 0, 0).unwrap();
        let items = vec![
            item("b", "Second", "x2", ItemType::Book),
            item("a", "First", "x1", ItemType::Book),
        ];
        let records = vec![
            record_at("b", "u1", t, true),
            record_at("a", "u2", t + Duration::hours(1), true),
        ];
        let (_, ledger) = ledger_with(items, records).await;

        let rank = ledger.ranking(RankingPeriod::AllTime, None).await.unwrap();
        assert_eq!(rank[0].id, "a");
        assert_eq!(rank[1].id, "b");
    }

    #[tokio::test]
    async fn active_and_overdue_counts() {
        let long_ago = Utc::now() - Duration::days(30);
        let records = vec![
            record_at("1", "u1", long_ago, false),        // open, overdue
            record_at("2", "u1", Utc::now(), false),      // open, not due
            record_at("3", "u2", long_ago, true),         // closed
        ];
        let (_, ledger) = ledger_with(vec![], records).await;

        assert_eq!(ledger.count_active().await.unwrap(), 2);
        assert_eq!(ledger.count_overdue().await.unwrap(), 1);
    }
}
