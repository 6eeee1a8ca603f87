//! Shared in-memory store backing the repositories.
//!
//! One `RwLock` guards the whole ledger state: writers get the full
//! validate-then-mutate sequence atomically, readers get a consistent
//! snapshot. Swapping the persistence backend means replacing this type
//! behind the repository layer; nothing above it touches the lock.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::{BorrowingRecord, Item},
};

/// Mutable ledger state. Items keep catalog (insertion) order; records
/// are append-only in borrow order.
#[derive(Debug, Default)]
pub struct StoreInner {
    pub items: IndexMap<String, Item>,
    pub records: Vec<BorrowingRecord>,
}

impl StoreInner {
    /// Open records referencing the given item, in append order
    pub fn open_records_for_item<'a>(
        &'a self,
        item_id: &'a str,
    ) -> impl Iterator<Item = &'a BorrowingRecord> {
        self.records
            .iter()
            .filter(move |r| r.item_id == item_id && r.is_open())
    }
}

/// Cloneable handle to the shared store
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a read-only closure against a consistent snapshot
    pub async fn read<R>(&self, f: impl FnOnce(&StoreInner) -> R) -> R {
        let guard = self.inner.read().await;
        f(&guard)
    }

    /// Run a closure under the write lock. Closures must validate before
    /// mutating so that an `Err` leaves the state untouched; the lock
    /// guarantees no other borrow/return interleaves.
    pub async fn update<R>(
        &self,
        f: impl FnOnce(&mut StoreInner) -> AppResult<R>,
    ) -> AppResult<R> {
        let mut guard = self.inner.write().await;
        f(&mut guard)
    }

    /// Replace the store contents with a seeded catalog and history
    pub async fn load(&self, items: Vec<Item>, records: Vec<BorrowingRecord>) {
        let mut guard = self.inner.write().await;
        guard.items = items.into_iter().map(|i| (i.id.clone(), i)).collect();
        guard.records = records;
    }
}
