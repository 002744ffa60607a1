//! Process configuration, read once at startup from the environment.
//!
//! | variable | default |
//! |---|---|
//! | `DATABASE_URL` | unset: serve without persistence |
//! | `HOST` | `127.0.0.1` |
//! | `PORT` | `5000` |
//! | `CORS_ORIGIN` | `http://localhost:5173` |
//! | `TODAI_API_URL` | `http://127.0.0.1:5000/api` (client only) |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::http::HeaderValue;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub host: IpAddr,
    pub port: u16,
    pub cors_origin: HeaderValue,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            cors_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let host = match get("HOST") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "HOST",
                message: format!("{raw:?} is not an IP address"),
            })?,
            None => defaults.host,
        };
        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                message: format!("{raw:?} is not a port number"),
            })?,
            None => defaults.port,
        };
        let cors_origin = match get("CORS_ORIGIN") {
            Some(raw) => HeaderValue::from_str(&raw).map_err(|_| ConfigError::InvalidValue {
                key: "CORS_ORIGIN",
                message: format!("{raw:?} is not a valid header value"),
            })?,
            None => defaults.cors_origin,
        };

        Ok(Self { database_url: get("DATABASE_URL"), host, port, cors_origin })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Base URL the terminal client talks to.
pub fn api_url_from_env() -> String {
    std::env::var("TODAI_API_URL")
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}
