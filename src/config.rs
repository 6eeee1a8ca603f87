//! Configuration management for the LibLend server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Lending policy knobs
#[derive(Debug, Deserialize, Clone)]
pub struct LendingConfig {
    /// Loan period in calendar days, applied from the borrow instant
    pub loan_period_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    /// Path to a JSON catalog seed loaded at startup
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub lending: LendingConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix LIBLEND_)
            .add_source(
                Environment::with_prefix("LIBLEND")
                    .separator("_")
                    .try_parsing(true),
            )
            // Override seed path from SEED_PATH env var if present
            .set_override_option("seed.path", env::var("SEED_PATH").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            loan_period_days: 14,
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            path: Some("data/seed.json".to_string()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            lending: LendingConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}
