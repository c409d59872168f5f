//! Application layer containing orchestration logic and shared state.

pub mod service;
pub mod state;

pub use service::GatewayService;
pub use state::AppState;
