//! HTTP routing configuration with per-route enablement gating.
//!
//! Every gateway route is registered only when its `(module, route)` flag
//! resolves true; a disabled route is never added, so requests to it fall
//! through to axum's 404 without any handler existing.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, Response, StatusCode},
    middleware::{self, Next},
    response::IntoResponse,
    routing::{MethodRouter, get, post},
};
use governor::{Quota, RateLimiter};
use tower::ServiceBuilder;
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::app::AppState;
use crate::domain::{ErrorDetail, ErrorResponse, RateLimitResponse};
use crate::infra::RouteToggles;

use super::handlers::{
    completion_handler, decode_handler, embedding_handler, encode_handler, health_check_handler,
    liveness_handler, metrics_handler, readiness_handler, root_handler, token_count_handler,
    trace_ingest_handler, upload_dataset_handler,
};

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests per second for gateway endpoints
    pub gateway_rps: u32,
    /// Burst size for gateway endpoints
    pub gateway_burst: u32,
    /// Requests per second for health endpoints
    pub health_rps: u32,
    /// Burst size for health endpoints
    pub health_burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            gateway_rps: 10,
            gateway_burst: 20,
            health_rps: 100,
            health_burst: 100,
        }
    }
}

impl RateLimitConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let gateway_rps = std::env::var("RATE_LIMIT_RPS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);
        let gateway_burst = std::env::var("RATE_LIMIT_BURST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);

        Self {
            gateway_rps,
            gateway_burst,
            health_rps: 100,
            health_burst: 100,
        }
    }
}

type KeyedLimiter = RateLimiter<
    IpAddr,
    governor::state::keyed::DashMapStateStore<IpAddr>,
    governor::clock::DefaultClock,
>;

/// Shared rate limiter state (keyed by client IP to prevent global DoS)
pub struct RateLimitState {
    gateway_limiter: KeyedLimiter,
    health_limiter: KeyedLimiter,
    config: RateLimitConfig,
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig) -> Self {
        let gateway_quota = Quota::per_second(
            NonZeroU32::new(config.gateway_rps).unwrap_or(NonZeroU32::MIN),
        )
        .allow_burst(NonZeroU32::new(config.gateway_burst).unwrap_or(NonZeroU32::MIN));
        let health_quota =
            Quota::per_second(NonZeroU32::new(config.health_rps).unwrap_or(NonZeroU32::MIN))
                .allow_burst(NonZeroU32::new(config.health_burst).unwrap_or(NonZeroU32::MIN));

        Self {
            gateway_limiter: RateLimiter::dashmap(gateway_quota),
            health_limiter: RateLimiter::dashmap(health_quota),
            config,
        }
    }
}

/// Extract client IP from request (X-Forwarded-For, X-Real-IP, or ConnectInfo).
/// Falls back to 0.0.0.0 when unknown; unknown clients share one bucket.
fn client_ip_from_request<B>(request: &Request<B>) -> IpAddr {
    // Prefer proxy headers (client is first in X-Forwarded-For)
    if let Some(forwarded) = request.headers().get("x-forwarded-for") {
        if let Ok(s) = forwarded.to_str() {
            if let Some(first) = s.split(',').next() {
                if let Ok(ip) = first.trim().parse::<IpAddr>() {
                    return ip;
                }
            }
        }
    }
    if let Some(real_ip) = request.headers().get("x-real-ip") {
        if let Ok(s) = real_ip.to_str() {
            if let Ok(ip) = s.trim().parse::<IpAddr>() {
                return ip;
            }
        }
    }
    if let Some(addr) = request.extensions().get::<SocketAddr>() {
        return addr.ip();
    }
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn retry_after_secs(not_until: &governor::NotUntil<governor::clock::QuantaInstant>) -> u64 {
    not_until
        .wait_time_from(governor::clock::Clock::now(
            &governor::clock::DefaultClock::default(),
        ))
        .as_secs()
}

/// Rate limit middleware for gateway endpoints (per-IP)
async fn rate_limit_gateway_middleware(
    State(rate_limit): State<Arc<RateLimitState>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let client_ip = client_ip_from_request(&request);
    match rate_limit.gateway_limiter.check_key(&client_ip) {
        Ok(_) => {
            let mut response = next.run(request).await;
            if let Ok(limit) = rate_limit.config.gateway_rps.to_string().parse() {
                response.headers_mut().insert("X-RateLimit-Limit", limit);
            }
            response
        }
        Err(not_until) => {
            let retry_after = retry_after_secs(&not_until);

            let body = RateLimitResponse {
                error: ErrorDetail {
                    r#type: "rate_limited".to_string(),
                    message: "Rate limit exceeded. Please slow down your requests.".to_string(),
                },
                retry_after,
            };

            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            let headers = response.headers_mut();
            if let Ok(limit) = rate_limit.config.gateway_rps.to_string().parse() {
                headers.insert("X-RateLimit-Limit", limit);
            }
            if let Ok(remaining) = "0".parse() {
                headers.insert("X-RateLimit-Remaining", remaining);
            }
            if let Ok(retry) = retry_after.to_string().parse() {
                headers.insert("Retry-After", retry);
            }
            response
        }
    }
}

/// Rate limit middleware for health endpoints (per-IP, high quota)
async fn rate_limit_health_middleware(
    State(rate_limit): State<Arc<RateLimitState>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let client_ip = client_ip_from_request(&request);
    match rate_limit.health_limiter.check_key(&client_ip) {
        Ok(_) => next.run(request).await,
        Err(not_until) => {
            let retry_after = retry_after_secs(&not_until);

            let body = ErrorResponse {
                error: ErrorDetail {
                    r#type: "rate_limited".to_string(),
                    message: "Rate limit exceeded".to_string(),
                },
            };

            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            if let Ok(retry) = retry_after.to_string().parse() {
                response.headers_mut().insert("Retry-After", retry);
            }
            response
        }
    }
}

/// Gateway routes, each registered only when its enablement flag holds.
fn gateway_routes(toggles: &RouteToggles) -> Router<Arc<AppState>> {
    let gated: [(&str, &str, &str, MethodRouter<Arc<AppState>>); 7] = [
        ("embedding", "index", "/embedding", post(embedding_handler)),
        (
            "embedding",
            "dataset",
            "/embedding/dataset",
            post(upload_dataset_handler),
        ),
        (
            "inference",
            "completions",
            "/inference/completions",
            post(completion_handler),
        ),
        ("token", "count", "/token/count", post(token_count_handler)),
        ("tracing", "index", "/tracing", post(trace_ingest_handler)),
        ("encoder", "index", "/encoder", post(encode_handler)),
        ("decoder", "index", "/decoder", post(decode_handler)),
    ];

    let mut router = Router::new();
    for (module, route, path, handler) in gated {
        if toggles.is_enabled(module, route) {
            router = router.route(path, handler);
        } else {
            tracing::debug!(module, route, path, "Route disabled, not registered");
        }
    }
    router
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check_handler))
        .route("/live", get(liveness_handler))
        .route("/ready", get(readiness_handler))
}

/// Create router without rate limiting
pub fn create_router(app_state: Arc<AppState>, toggles: &RouteToggles) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .merge(gateway_routes(toggles))
        .nest("/health", health_routes())
        .layer(middleware)
        .with_state(app_state)
}

/// Create router with rate limiting enabled
pub fn create_router_with_rate_limit(
    app_state: Arc<AppState>,
    toggles: &RouteToggles,
    config: RateLimitConfig,
) -> Router {
    let rate_limit_state = Arc::new(RateLimitState::new(config));

    let middleware = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    let gateway = gateway_routes(toggles).layer(middleware::from_fn_with_state(
        Arc::clone(&rate_limit_state),
        rate_limit_gateway_middleware,
    ));

    let health = health_routes().layer(middleware::from_fn_with_state(
        Arc::clone(&rate_limit_state),
        rate_limit_health_middleware,
    ));

    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .merge(gateway)
        .nest("/health", health)
        .layer(middleware)
        .with_state(app_state)
}
