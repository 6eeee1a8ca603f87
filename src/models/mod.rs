//! Data models for LibLend

pub mod item;
pub mod loan;
pub mod ranking;

// Re-export commonly used types
pub use item::{Item, ItemType};
pub use loan::BorrowingRecord;
pub use ranking::{RankingEntry, RankingPeriod};
