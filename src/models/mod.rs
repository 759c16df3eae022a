//! Data models representing database entities and API bodies.

/// Card account model
pub mod card;
/// Transaction log model and request/response bodies
pub mod transaction;
