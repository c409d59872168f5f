//! Environment-driven gateway configuration.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::ConfigError;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_ENGINE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_KEYS_DIR: &str = "keys";

/// Process-level settings, read once at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Base URL of the upstream inference engine.
    pub engine_url: String,
    /// Directory holding `public_key.pem` / `private_key.pem`.
    pub keys_dir: PathBuf,
}

impl GatewayConfig {
    /// Build from `BIND_ADDR`, `ENGINE_URL` and `KEYS_DIR`, with defaults
    /// for anything unset. Call after `dotenvy::dotenv()`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr =
            parse_bind_addr(&env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into()))?;
        let engine_url = env::var("ENGINE_URL").unwrap_or_else(|_| DEFAULT_ENGINE_URL.into());
        let keys_dir = PathBuf::from(env::var("KEYS_DIR").unwrap_or_else(|_| DEFAULT_KEYS_DIR.into()));

        Ok(Self {
            bind_addr,
            engine_url,
            keys_dir,
        })
    }
}

fn parse_bind_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: "BIND_ADDR".to_string(),
        message: format!("'{value}' is not a socket address"),
    })
}
