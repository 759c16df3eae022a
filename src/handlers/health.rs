//! Health check endpoint for service monitoring.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::AppError, store::SharedStore};

/// Health check response.
///
/// Returns service status and which storage backend is in use.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Storage backend ("postgres" or "memory")
    pub storage: String,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "storage": "postgres",
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
///
/// If the database is unreachable, returns the standard 500 error response.
pub async fn health_check(State(store): State<SharedStore>) -> Result<Json<HealthResponse>, AppError> {
    store.ping().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        storage: store.backend().to_string(),
        timestamp: Utc::now(),
    }))
}
