//! Router construction for both services.
//!
//! Kept in the library so the binaries and the integration tests build the
//! exact same applications.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, services::gateway_service::CoreClient, store::SharedStore};

/// Core banking service routes.
///
/// - `POST /api/process`
/// - `GET /api/balance/{cardNumber}`
/// - `GET /api/transactions/customer/{cardNumber}`
/// - `GET /api/transactions/all`
/// - `GET /health`
pub fn core_app(store: SharedStore) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/process", post(handlers::processing::process))
        .route("/api/balance/{card_number}", get(handlers::queries::balance))
        .route(
            "/api/transactions/customer/{card_number}",
            get(handlers::queries::customer_transactions),
        )
        .route(
            "/api/transactions/all",
            get(handlers::queries::all_transactions),
        )
        // Dashboards call the query endpoints straight from the browser
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Gateway service routes.
///
/// - `POST /api/transaction`
/// - `GET /api/ping`
pub fn gateway_app(core: CoreClient) -> Router {
    Router::new()
        .route("/api/transaction", post(handlers::gateway::handle_transaction))
        .route("/api/ping", get(handlers::gateway::ping))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(core)
}
