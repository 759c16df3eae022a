//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.

pub mod card_service;
pub mod gateway_service;
