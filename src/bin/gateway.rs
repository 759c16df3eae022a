//! Transaction Gateway - Application Entry Point
//!
//! Validates incoming transactions and forwards supported card ranges to the
//! core banking service.

use std::time::Duration;

use rust_card_banking::{config::GatewayConfig, routes, services::gateway_service::CoreClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG (defaults to "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = GatewayConfig::from_env()?;
    tracing::info!("Configuration loaded");

    let core = CoreClient::new(
        config.process_url()?,
        Duration::from_secs(config.forward_timeout_secs),
    )?;
    tracing::info!("Forwarding transactions to {}", core.process_url());

    let app = routes::gateway_app(core);

    let addr = format!("0.0.0.0:{}", config.gateway_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Gateway listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
