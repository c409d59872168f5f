use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tracing::info;

use inference_gateway::api::{RateLimitConfig, create_router_with_rate_limit};
use inference_gateway::app::AppState;
use inference_gateway::infra::{
    GatewayConfig, HttpEngineClient, RouteToggles, RsaMessageCipher, init_metrics_handle,
    init_tracing,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    init_tracing();

    let config = GatewayConfig::from_env()?;
    let toggles = RouteToggles::from_env()?;
    let rate_limit = RateLimitConfig::from_env();

    // Instantiate infrastructure components
    let engine = Arc::new(HttpEngineClient::new(&config.engine_url)?);
    let cipher = Arc::new(RsaMessageCipher::new(config.keys_dir.clone()));

    // Create shared application state; attach the metrics handle when the
    // recorder installs cleanly.
    let mut app_state = AppState::new(engine, cipher);
    if let Some(handle) = init_metrics_handle() {
        app_state = app_state.with_metrics(handle);
    }
    let app_state = Arc::new(app_state);

    let router = create_router_with_rate_limit(app_state, &toggles, rate_limit);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, engine = %config.engine_url, "Gateway starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
