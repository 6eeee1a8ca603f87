//! Borrowing record model and due-date arithmetic

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One loan in the ledger. Created open at borrow time, closed exactly
/// once at return time by setting `returned_at`, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingRecord {
    pub id: Uuid,
    pub item_id: String,
    /// Denormalized for display; the catalog stays authoritative
    pub item_title: String,
    pub user_id: String,
    pub user_name: String,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned_at: Option<DateTime<Utc>>,
}

impl BorrowingRecord {
    /// An open record has not been returned yet
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }

    /// True iff the record is still open and `as_of` is past the due date.
    /// Pure in its inputs; callers must recompute per query.
    pub fn is_overdue(&self, as_of: DateTime<Utc>) -> bool {
        self.is_open() && as_of > self.due_date
    }

    pub fn days_remaining(&self, as_of: DateTime<Utc>) -> i64 {
        days_remaining(self.due_date, as_of)
    }
}

/// Whole days until `due_date`, rounded away from zero: a partial day
/// remaining counts as one day left, a partial day past due counts as one
/// day late. Negative exactly when `as_of` is past `due_date`.
pub fn days_remaining(due_date: DateTime<Utc>, as_of: DateTime<Utc>) -> i64 {
    const MS_PER_DAY: i64 = 86_400_000;
    let ms = (due_date - as_of).num_milliseconds();
    if ms > 0 {
        (ms + MS_PER_DAY - 1) / MS_PER_DAY
    } else if ms < 0 {
        -((-ms + MS_PER_DAY - 1) / MS_PER_DAY)
    } else {
        0
    }
}
