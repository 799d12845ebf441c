use std::env;
use std::net::SocketAddr;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::SecurityHeaders;

const DEFAULT_DATA_SERVICE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the REST service holding events, categories and users.
    pub data_service_url: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_service_url = lookup("DATA_SERVICE_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_SERVICE_URL.to_string());

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
                tracing::warn!("Config: Invalid BIND_ADDR '{}': {}", raw, e);
                default_bind_addr()
            }),
            None => default_bind_addr(),
        };

        Self {
            data_service_url,
            bind_addr,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3001))
}
