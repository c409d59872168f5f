//! Infrastructure layer implementations.

pub mod config;
pub mod crypto;
pub mod engine;
pub mod observability;
pub mod routes_config;

pub use config::GatewayConfig;
pub use crypto::RsaMessageCipher;
pub use engine::{EngineClientConfig, HttpEngineClient};
pub use observability::{PrometheusHandle, init_metrics, init_metrics_handle, init_tracing};
pub use routes_config::RouteToggles;
