//! Application state management.
//!
//! Shared state handed to every request handler via Axum's State extractor.

use std::sync::Arc;

use crate::domain::{EngineClient, MessageCipher};
use crate::infra::PrometheusHandle;

use super::service::GatewayService;

/// Shared application state for the Axum web server.
///
/// Holds thread-safe references to the gateway service and the trait seams,
/// so handlers never see concrete implementations.
#[derive(Clone)]
pub struct AppState {
    /// The gateway service containing the orchestration logic.
    pub service: Arc<GatewayService>,

    /// Upstream engine client.
    pub engine: Arc<dyn EngineClient>,

    /// RSA-OAEP message cipher.
    pub cipher: Arc<dyn MessageCipher>,

    /// Prometheus render handle; `None` when no recorder is installed
    /// (unit tests, or a second process instance).
    pub metrics: Option<Arc<PrometheusHandle>>,
}

impl AppState {
    /// Wire the service to the provided clients.
    #[must_use]
    pub fn new(engine: Arc<dyn EngineClient>, cipher: Arc<dyn MessageCipher>) -> Self {
        let service = Arc::new(GatewayService::new(
            Arc::clone(&engine),
            Arc::clone(&cipher),
        ));

        Self {
            service,
            engine,
            cipher,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the /metrics endpoint.
    #[must_use]
    pub fn with_metrics(mut self, handle: Arc<PrometheusHandle>) -> Self {
        self.metrics = Some(handle);
        self
    }
}
