//! Startup catalog seeding from a JSON file.
//!
//! The seed may carry borrowing history too; items marked on-loan must
//! come with their open record, otherwise the file is rejected rather
//! than loaded into an inconsistent ledger.

use std::path::Path;

use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{
        item::{classify_barcode, Item},
        loan::BorrowingRecord,
    },
    repository::store::MemoryStore,
};

#[derive(Debug, Deserialize)]
pub struct SeedData {
    pub items: Vec<Item>,
    #[serde(default)]
    pub records: Vec<BorrowingRecord>,
}

impl SeedData {
    /// Read and parse a seed file
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Internal(format!("Cannot read seed file {}: {}", path.display(), e))
        })?;
        let seed: SeedData = serde_json::from_str(&raw).map_err(|e| {
            AppError::Validation(format!("Malformed seed file {}: {}", path.display(), e))
        })?;
        seed.validate()?;
        Ok(seed)
    }

    /// Enforce the ledger invariants on the seed: unique item ids and
    /// barcodes, loan fields matching availability, and exactly one open
    /// record per on-loan item (zero per available item).
    pub fn validate(&self) -> AppResult<()> {
        let mut ids = std::collections::HashSet::new();
        let mut barcodes = std::collections::HashSet::new();

        for item in &self.items {
            if !ids.insert(item.id.as_str()) {
                return Err(AppError::Validation(format!("Duplicate item id {}", item.id)));
            }
            if !barcodes.insert(item.barcode.as_str()) {
                return Err(AppError::Validation(format!(
                    "Duplicate barcode {}",
                    item.barcode
                )));
            }
            if !item.loan_fields_consistent() {
                return Err(AppError::Validation(format!(
                    "Item {}: loan fields do not match availability",
                    item.id
                )));
            }
            // Scanner convention is a hint, not a rule; flag but accept.
            if classify_barcode(&item.barcode) != item.item_type {
                tracing::debug!(
                    item = %item.id,
                    barcode = %item.barcode,
                    "barcode prefix does not match the declared item type"
                );
            }

            let open = self
                .records
                .iter()
                .filter(|r| r.item_id == item.id && r.is_open())
                .count();
            let expected = usize::from(!item.available);
            if open != expected {
                return Err(AppError::Validation(format!(
                    "Item {}: available={} but {} open record(s)",
                    item.id, item.available, open
                )));
            }
        }

        for record in &self.records {
            if !ids.contains(record.item_id.as_str()) {
                return Err(AppError::Validation(format!(
                    "Record {} references unknown item {}",
                    record.id, record.item_id
                )));
            }
        }

        Ok(())
    }

    /// Load the seed into a store
    pub async fn load_into(self, store: &MemoryStore) {
        tracing::info!(
            items = self.items.len(),
            records = self.records.len(),
            "catalog seeded"
        );
        store.load(self.items, self.records).await;
    }
}
