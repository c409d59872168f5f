//! HTTP request handlers.
//!
//! Thin axum handlers delegating to [`crate::app::GatewayService`]; the
//! routing layer itself decides which of these are reachable (see `router.rs`).

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use tracing::error;

use crate::app::AppState;
use crate::domain::{
    AppError, CompletionRequest, CompletionResponse, CryptoError, DecodeRequest, DecodeResponse,
    EmbeddingRequest, EmbeddingResponse, EncodeRequest, EncodeResponse, EngineError, ErrorDetail,
    ErrorResponse, HealthResponse, HealthStatus, TokenCountRequest, TokenCountResponse,
    TraceIngestRequest, TraceIngestResponse, UploadDatasetRequest, UploadDatasetResponse,
};

/// Static greeting on the gateway root.
pub async fn root_handler() -> Html<&'static str> {
    Html("<h1>hello world</h1>")
}

/// Compute an embedding for one input.
pub async fn embedding_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EmbeddingRequest>,
) -> Result<Json<EmbeddingResponse>, AppError> {
    let response = state.service.embed(&payload).await?;
    Ok(Json(response))
}

/// Embed every row of an uploaded dataset.
pub async fn upload_dataset_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UploadDatasetRequest>,
) -> Result<Json<UploadDatasetResponse>, AppError> {
    let response = state.service.upload_dataset(&payload).await?;
    Ok(Json(response))
}

/// Run a text completion.
pub async fn completion_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CompletionRequest>,
) -> Result<Json<CompletionResponse>, AppError> {
    let response = state.service.complete(&payload).await?;
    Ok(Json(response))
}

/// Count tokens in a piece of text.
pub async fn token_count_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TokenCountRequest>,
) -> Result<Json<TokenCountResponse>, AppError> {
    let response = state.service.count_tokens(&payload).await?;
    Ok(Json(response))
}

/// Ingest a batch of client trace events.
pub async fn trace_ingest_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TraceIngestRequest>,
) -> Result<Json<TraceIngestResponse>, AppError> {
    let response = state.service.ingest_traces(&payload)?;
    Ok(Json(response))
}

/// Encode text into token ids.
pub async fn encode_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EncodeRequest>,
) -> Result<Json<EncodeResponse>, AppError> {
    let response = state.service.encode(&payload).await?;
    Ok(Json(response))
}

/// Decode token ids back into text.
pub async fn decode_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DecodeRequest>,
) -> Result<Json<DecodeResponse>, AppError> {
    let response = state.service.decode(&payload).await?;
    Ok(Json(response))
}

/// Detailed health check.
pub async fn health_check_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let health = state.service.health_check().await;
    Json(health)
}

/// Liveness probe.
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe; 503 when the upstream engine is unreachable.
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    let health = state.service.health_check().await;
    match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Prometheus scrape output.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed",
        )
            .into_response(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_type, message) = match &self {
            AppError::Crypto(crypto_err) => match crypto_err {
                CryptoError::InvalidCiphertext(_)
                | CryptoError::Decrypt(_)
                | CryptoError::InvalidPlaintext(_) => {
                    (StatusCode::BAD_REQUEST, "invalid_envelope", self.to_string())
                }
                CryptoError::PayloadTooLarge { .. } => (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "payload_too_large",
                    self.to_string(),
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "crypto_error",
                    self.to_string(),
                ),
            },
            AppError::Engine(engine_err) => match engine_err {
                EngineError::Timeout(_) => {
                    (StatusCode::GATEWAY_TIMEOUT, "timeout", self.to_string())
                }
                _ => (StatusCode::BAD_GATEWAY, "engine_error", self.to_string()),
            },
            AppError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "configuration_error",
                self.to_string(),
            ),
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                self.to_string(),
            ),
            AppError::Serialization(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "serialization_error",
                self.to_string(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                self.to_string(),
            ),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Rate limit exceeded".to_string(),
            ),
        };

        if status.is_server_error() {
            error!(error_type = %error_type, message = %message, "Server error");
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                r#type: error_type.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationError;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_crypto_error_status_mapping() {
        assert_eq!(
            status_of(CryptoError::InvalidCiphertext("x".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CryptoError::Decrypt("x".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CryptoError::PayloadTooLarge { len: 300, max: 190 }.into()),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_of(
                CryptoError::KeyUnavailable {
                    path: "keys/public_key.pem".into(),
                    message: "missing".into(),
                }
                .into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_engine_error_status_mapping() {
        assert_eq!(
            status_of(EngineError::Connection("refused".into()).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(EngineError::Timeout("30s".into()).into()),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn test_validation_error_status_mapping() {
        assert_eq!(
            status_of(ValidationError::MissingField("input".into()).into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_rate_limited_status_mapping() {
        assert_eq!(status_of(AppError::RateLimited), StatusCode::TOO_MANY_REQUESTS);
    }
}
