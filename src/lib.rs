//! Inference API gateway.
//!
//! A thin HTTP routing layer in front of an upstream inference engine, plus a
//! helper that seals small payloads with RSA-OAEP. The gateway forwards every
//! operation; it implements neither inference nor cryptography itself.
//!
//! # Architecture Overview
//!
//! This crate is organized into four main layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   API Layer                  │
//! │   Route table (enablement-gated), handlers   │
//! ├─────────────────────────────────────────────┤
//! │               Application Layer              │
//! │   Request orchestration, envelope opening    │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │   Traits, types, errors (no dependencies)    │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │  Engine HTTP client, RSA cipher, toggles     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Key Features
//!
//! - **Route enablement gating**: each gateway route is registered only when
//!   its `(module, route)` flag holds; disabled routes are absent, not stubbed
//! - **Trait-based abstraction**: the engine client and the message cipher
//!   are trait seams with mock implementations for tests
//! - **RSA-OAEP sealing**: request fields may arrive as base64 RSA envelopes,
//!   opened against keys read fresh from disk on every call
//! - **Error handling**: hierarchical error types mapped to HTTP in one place
//! - **Observability**: structured logging with `tracing`, Prometheus metrics
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use inference_gateway::api::create_router;
//! use inference_gateway::app::AppState;
//! use inference_gateway::infra::{HttpEngineClient, RouteToggles, RsaMessageCipher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = Arc::new(HttpEngineClient::new("http://127.0.0.1:8080")?);
//!     let cipher = Arc::new(RsaMessageCipher::with_default_dir());
//!
//!     let state = Arc::new(AppState::new(engine, cipher));
//!     let toggles = RouteToggles::from_env()?;
//!
//!     let router = create_router(state, &toggles);
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, router).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infra;

pub mod test_utils;
