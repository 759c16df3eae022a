//! Core Banking Service - Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Pick the store: PostgreSQL when `DATABASE_URL` is set, in-memory otherwise
//! 3. Run database migrations (PostgreSQL only)
//! 4. Seed demo cards
//! 5. Start server on configured port

use std::sync::Arc;

use rust_card_banking::{
    config::CoreConfig,
    db, routes,
    services::card_service,
    store::{MemoryCardStore, PgCardStore, SharedStore},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = CoreConfig::from_env()?;
    tracing::info!("Configuration loaded");

    let store: SharedStore = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = db::create_pool(database_url, config.database_max_connections).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            Arc::new(PgCardStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryCardStore::new())
        }
    };

    if config.seed_demo_cards {
        let inserted = card_service::seed_demo_cards(store.as_ref()).await?;
        tracing::info!("Seeded {} demo card(s)", inserted);
    }

    let app = routes::core_app(store);

    let addr = format!("0.0.0.0:{}", config.core_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Core banking service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
