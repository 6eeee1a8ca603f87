//! LibLend Library & Thesis Lending Management System
//!
//! A Rust implementation of the LibLend lending backend, providing a REST
//! JSON API over the lending ledger: catalog search, borrow/return
//! workflows, borrowing history, and popularity rankings.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod seed;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
