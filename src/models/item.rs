//! Item (catalog entry) model and related types.
//!
//! Wire format is camelCase JSON, matching the consuming frontend
//! (`borrowedBy`, `borrowedAt`, `dueDate`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Kind of lendable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Book,
    Thesis,
}

impl ItemType {
    pub fn as_code(&self) -> &'static str {
        match self {
            ItemType::Book => "book",
            ItemType::Thesis => "thesis",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// Item type filter for catalog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemTypeFilter {
    #[default]
    All,
    Book,
    Thesis,
}

impl ItemTypeFilter {
    /// True when `item_type` passes this filter
    pub fn matches(&self, item_type: ItemType) -> bool {
        match self {
            ItemTypeFilter::All => true,
            ItemTypeFilter::Book => item_type == ItemType::Book,
            ItemTypeFilter::Thesis => item_type == ItemType::Thesis,
        }
    }
}

/// Full item model. The loan fields (`borrowed_by`, `borrowed_at`,
/// `due_date`) are a derived view owned by the ledger: present exactly
/// while the item is on loan, absent while it is available.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Unique lending key, scanned at the desk
    pub barcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copies: Option<u32>,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrowed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrowed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl Item {
    /// True when the availability flag and the loan fields agree
    pub fn loan_fields_consistent(&self) -> bool {
        if self.available {
            self.borrowed_by.is_none() && self.borrowed_at.is_none() && self.due_date.is_none()
        } else {
            self.borrowed_by.is_some() && self.borrowed_at.is_some() && self.due_date.is_some()
        }
    }
}

/// Item query parameters (API)
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ItemQuery {
    /// Restrict to one item type (`book`, `thesis`, or `all`)
    #[serde(default, rename = "type")]
    pub item_type: ItemTypeFilter,
    /// Substring search over title, author, ISBN and barcode
    pub query: Option<String>,
}

/// Guess an item type from a scanned barcode.
///
/// Legacy desk-scanner convention: EAN/ISBN barcodes start with '9',
/// thesis shelf codes do not. Classification hint only; the ledger never
/// relies on it.
pub fn classify_barcode(barcode: &str) -> ItemType {
    if barcode.starts_with('9') {
        ItemType::Book
    } else {
        ItemType::Thesis
    }
}
