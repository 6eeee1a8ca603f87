//! LibLend Server - Library & Thesis Lending Management System
//!
//! REST API server over the lending ledger.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use liblend_server::{
    api, config::AppConfig, repository::Repository, seed::SeedData, services::Services, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("liblend_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting LibLend Server v{}", env!("CARGO_PKG_VERSION"));

    // Create the in-memory repository and seed the catalog
    let repository = Repository::in_memory(&config.lending);

    match &config.seed.path {
        Some(path) if std::path::Path::new(path).exists() => {
            let seed = SeedData::from_path(path)
                .map_err(|e| anyhow::anyhow!("Seed load failed: {e}"))?;
            seed.load_into(&repository.store).await;
        }
        Some(path) => {
            tracing::warn!("Seed file {} not found, starting with an empty catalog", path);
        }
        None => {
            tracing::info!("No seed configured, starting with an empty catalog");
        }
    }

    // Create services and application state
    let services = Services::new(repository);
    let state = AppState {
        config: Arc::new(config.clone()),
        services: Arc::new(services),
    };

    // Build router
    let app = api::create_router(state);

    // Start server
    let addr = SocketAddr::new(
        config.server.host.parse().expect("Invalid host address"),
        config.server.port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
