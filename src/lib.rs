//! Card banking demo: a validating gateway in front of a core banking service.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx, or an in-memory store
//! - **PIN storage**: SHA-256 hex digests
//! - **Format**: JSON requests/responses
//!
//! # Services
//!
//! - `gateway` binary: validates requests, routes by card range, forwards to core
//! - `core-bank` binary: owns cards and the transaction log

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
