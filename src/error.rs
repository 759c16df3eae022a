//! Error types and HTTP error response handling.
//!
//! This module defines all infrastructure and validation errors and how they
//! are converted into HTTP responses with appropriate status codes and JSON
//! bodies.
//!
//! Business declines (invalid card, invalid PIN, insufficient balance) are not
//! errors: they are recorded as FAILED transactions and returned as ordinary
//! responses by the processing handler.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::transaction::ProcessResponse;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Storage Errors**: Any sqlx::Error from database operations
/// - **Validation Errors**: Gateway request failed field validation
/// - **Upstream Errors**: The gateway could not get a usable answer from the core service
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request body is invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String is the exact message shown to the client.
    #[error("{0}")]
    Validation(String),

    /// Forwarding to the core service failed (network, timeout, bad response).
    ///
    /// Returns HTTP 503 Service Unavailable.
    #[error("Core service processing error: {0}")]
    Upstream(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }
}

/// Malformed or mistyped JSON bodies answer like any other validation failure.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(err.to_string())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// Errors share the body shape of transaction responses so clients only parse
/// one format:
/// ```json
/// {
///   "status": "FAILED",
///   "message": "Card number is required"
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `Validation` → 400 Bad Request
/// - `Upstream` → 503 Service Unavailable
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream(_) => {
                tracing::warn!("{}", self);
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            AppError::Database(ref err) => {
                tracing::error!("database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ProcessResponse::failed(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_category() {
        assert_eq!(
            AppError::validation("PIN is required").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Upstream("connection refused".into())
                .into_response()
                .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn json_rejection_becomes_failed_validation() {
        use crate::models::transaction::TransactionRequest;
        use axum::{body::Body, extract::FromRequest, http::Request};

        let request = Request::post("/")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"amount": "abc"}"#))
            .unwrap();
        let rejection = Json::<TransactionRequest>::from_request(request, &())
            .await
            .unwrap_err();

        let err = AppError::from(rejection);
        assert!(err.to_string().starts_with("Invalid request body: "));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_message_is_prefixed() {
        let err = AppError::Upstream("timed out".into());
        assert_eq!(err.to_string(), "Core service processing error: timed out");
    }
}
