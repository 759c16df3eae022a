//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives parsed request data (JSON body, URL params)
//! 2. Delegates to a service in `crate::services`
//! 3. Returns an HTTP response (JSON, status code)

/// Gateway endpoints: transaction submission and ping
pub mod gateway;
/// Core health endpoint
pub mod health;
/// Core transaction processing endpoint
pub mod processing;
/// Core balance and history endpoints
pub mod queries;
