//! Popularity ranking types

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

use super::item::ItemType;

/// Ranking aggregation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RankingPeriod {
    #[default]
    Monthly,
    AllTime,
}

/// One row of the popularity ranking
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub borrow_count: i64,
}

/// A calendar month (`YYYY-MM`) used to bucket monthly rankings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    /// The current month in UTC
    pub fn current() -> Self {
        let now = Utc::now();
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    /// Parse a `YYYY-MM` string
    pub fn parse(s: &str) -> AppResult<Self> {
        let invalid = || AppError::Validation(format!("Invalid month '{}', expected YYYY-MM", s));
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }

    /// True when `instant` falls inside this calendar month (UTC)
    pub fn contains(&self, instant: chrono::DateTime<Utc>) -> bool {
        instant.year() == self.year && instant.month() == self.month
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
