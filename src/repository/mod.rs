//! Storage layer for the lending ledger.
//!
//! Repositories share one [`store::MemoryStore`]; persistence is
//! swappable behind this module without touching services or handlers.

pub mod items;
pub mod loans;
pub mod store;

use crate::config::LendingConfig;

use store::MemoryStore;

/// Main repository struct holding the shared store
#[derive(Clone)]
pub struct Repository {
    pub store: MemoryStore,
    pub catalog: items::CatalogRepository,
    pub ledger: loans::LedgerRepository,
}

impl Repository {
    /// Create a new repository over the given store
    pub fn new(store: MemoryStore, lending: &LendingConfig) -> Self {
        Self {
            catalog: items::CatalogRepository::new(store.clone()),
            ledger: loans::LedgerRepository::new(store.clone(), lending.loan_period_days),
            store,
        }
    }

    /// Fresh empty in-memory repository
    pub fn in_memory(lending: &LendingConfig) -> Self {
        Self::new(MemoryStore::new(), lending)
    }
}
