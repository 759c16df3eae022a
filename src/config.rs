//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into
//! type-safe structs, one per service binary.

use serde::Deserialize;
use url::Url;

/// Core banking service configuration.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): PostgreSQL connection string. Without it the
///   service keeps cards and transactions in memory.
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `CORE_PORT` (optional): HTTP server port, defaults to 8082
/// - `SEED_DEMO_CARDS` (optional): insert the demo cards at startup, defaults to true
#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    pub database_url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_core_port")]
    pub core_port: u16,

    #[serde(default = "default_true")]
    pub seed_demo_cards: bool,
}

/// Gateway service configuration.
///
/// # Environment Variables
///
/// - `GATEWAY_PORT` (optional): HTTP server port, defaults to 8081
/// - `CORE_SERVICE_URL` (optional): base URL of the core service,
///   defaults to `http://localhost:8082`
/// - `FORWARD_TIMEOUT_SECS` (optional): timeout for one forwarded call, defaults to 10
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_port")]
    pub gateway_port: u16,

    #[serde(default = "default_core_service_url")]
    pub core_service_url: String,

    #[serde(default = "default_forward_timeout")]
    pub forward_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_core_port() -> u16 {
    8082
}

fn default_gateway_port() -> u16 {
    8081
}

fn default_core_service_url() -> String {
    "http://localhost:8082".to_string()
}

fn default_forward_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl CoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file first if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable value cannot be parsed
    /// into the expected type.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<CoreConfig>()
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a port or timeout cannot be parsed.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<GatewayConfig>()
    }

    /// Full URL of the core processing endpoint.
    ///
    /// A path on `CORE_SERVICE_URL` is kept as a prefix, so
    /// `http://core/bank` resolves to `http://core/bank/api/process`.
    ///
    /// # Errors
    ///
    /// Returns an error if `CORE_SERVICE_URL` is not an absolute URL.
    pub fn process_url(&self) -> Result<Url, url::ParseError> {
        let mut base = Url::parse(&self.core_service_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join("api/process")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn core_defaults_apply_when_unset() {
        let config: CoreConfig = envy::from_iter(Vec::<(String, String)>::new()).unwrap();

        assert!(config.database_url.is_none());
        assert_eq!(config.core_port, 8082);
        assert_eq!(config.database_max_connections, 5);
        assert!(config.seed_demo_cards);
    }

    #[test]
    fn gateway_reads_core_url_and_builds_process_url() {
        let config: GatewayConfig = envy::from_iter(vec![
            ("CORE_SERVICE_URL".to_string(), "http://core:9000".to_string()),
            ("GATEWAY_PORT".to_string(), "9001".to_string()),
        ])
        .unwrap();

        assert_eq!(config.gateway_port, 9001);
        assert_eq!(config.forward_timeout_secs, 10);
        assert_eq!(
            config.process_url().unwrap().as_str(),
            "http://core:9000/api/process"
        );
    }

    #[rstest]
    #[case("http://core/bank", "http://core/bank/api/process")]
    #[case("http://core/bank/", "http://core/bank/api/process")]
    #[case("http://core:9000/", "http://core:9000/api/process")]
    fn core_url_path_prefix_is_kept(#[case] core_url: &str, #[case] expected: &str) {
        let config: GatewayConfig =
            envy::from_iter(vec![("CORE_SERVICE_URL".to_string(), core_url.to_string())]).unwrap();

        assert_eq!(config.process_url().unwrap().as_str(), expected);
    }

    #[test]
    fn gateway_rejects_malformed_core_url() {
        let config: GatewayConfig = envy::from_iter(vec![(
            "CORE_SERVICE_URL".to_string(),
            "not a url".to_string(),
        )])
        .unwrap();

        assert!(config.process_url().is_err());
    }
}
