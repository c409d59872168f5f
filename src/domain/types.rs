use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

/// Request payload for computing a single embedding.
///
/// Exactly one of `input` (plaintext) and `sealed_input` (base64 RSA-OAEP
/// envelope of the text) must be present.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmbeddingRequest {
    #[validate(length(min = 1, max = 8192))]
    pub input: Option<String>,
    pub sealed_input: Option<String>,
}

impl EmbeddingRequest {
    pub fn plaintext(input: impl Into<String>) -> Self {
        Self {
            input: Some(input.into()),
            sealed_input: None,
        }
    }

    pub fn sealed(ciphertext: impl Into<String>) -> Self {
        Self {
            input: None,
            sealed_input: Some(ciphertext.into()),
        }
    }
}

/// Response payload for a single embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub embedding: Vec<f32>,
    pub dimension: usize,
}

/// One row of an uploaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatasetRow {
    pub id: Option<String>,
    #[validate(length(min = 1, max = 8192))]
    pub text: String,
}

/// Request payload for embedding a whole dataset in one call.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadDatasetRequest {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(length(min = 1, max = 1024), nested)]
    pub rows: Vec<DatasetRow>,
}

/// Summary returned after a dataset upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadDatasetResponse {
    pub name: String,
    pub rows: usize,
    pub dimension: usize,
}

/// Request payload for a text completion.
///
/// Exactly one of `prompt` and `sealed_prompt` must be present.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompletionRequest {
    #[validate(length(min = 1, max = 32768))]
    pub prompt: Option<String>,
    pub sealed_prompt: Option<String>,
    #[validate(range(min = 1, max = 4096))]
    pub max_tokens: Option<u32>,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn plaintext(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            sealed_prompt: None,
            max_tokens: None,
            temperature: None,
        }
    }
}

/// Sampling knobs forwarded to the upstream engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SamplingOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Token accounting for a completion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Response payload for a text completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: Uuid,
    pub text: String,
    pub usage: CompletionUsage,
}

/// Request payload for counting tokens in a piece of text.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TokenCountRequest {
    #[validate(length(min = 1, max = 32768))]
    pub input: String,
}

/// Response payload for a token count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenCountResponse {
    pub count: usize,
}

/// Request payload for encoding text into token ids.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EncodeRequest {
    #[validate(length(min = 1, max = 32768))]
    pub input: String,
}

/// Response payload for an encode call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncodeResponse {
    pub tokens: Vec<u32>,
}

/// Request payload for decoding token ids back into text.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DecodeRequest {
    #[validate(length(min = 1, max = 32768))]
    pub tokens: Vec<u32>,
}

/// Response payload for a decode call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecodeResponse {
    pub text: String,
}

/// A single client-side trace event pushed to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TraceEvent {
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    pub at: Option<DateTime<Utc>>,
    pub attributes: Option<Value>,
}

/// Request payload carrying a batch of trace events.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TraceIngestRequest {
    #[validate(length(min = 1, max = 512), nested)]
    pub events: Vec<TraceEvent>,
}

/// Response payload acknowledging ingested trace events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraceIngestResponse {
    pub accepted: usize,
}

/// Health check status for services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health check response for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub engine: HealthStatus,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn new(engine: HealthStatus) -> Self {
        Self {
            status: engine.clone(),
            engine,
            timestamp: Utc::now(),
        }
    }
}

/// Error detail in an error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub r#type: String,
    pub message: String,
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error response body for rate-limited requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitResponse {
    pub error: ErrorDetail,
    pub retry_after: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_embedding_request_constructors() {
        let plain = EmbeddingRequest::plaintext("hello");
        assert_eq!(plain.input.as_deref(), Some("hello"));
        assert!(plain.sealed_input.is_none());

        let sealed = EmbeddingRequest::sealed("AAAA");
        assert!(sealed.input.is_none());
        assert_eq!(sealed.sealed_input.as_deref(), Some("AAAA"));
    }

    #[test]
    fn test_embedding_request_rejects_empty_input() {
        let req = EmbeddingRequest::plaintext("");
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_completion_request_rejects_out_of_range_temperature() {
        let mut req = CompletionRequest::plaintext("hi");
        req.temperature = Some(3.5);
        assert!(req.validate().is_err());

        req.temperature = Some(0.7);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_upload_dataset_rejects_empty_rows() {
        let req = UploadDatasetRequest {
            name: "corpus".to_string(),
            rows: vec![],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_upload_dataset_validates_nested_rows() {
        let req = UploadDatasetRequest {
            name: "corpus".to_string(),
            rows: vec![DatasetRow {
                id: None,
                text: "".to_string(),
            }],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_health_response_mirrors_engine_status() {
        let healthy = HealthResponse::new(HealthStatus::Healthy);
        assert_eq!(healthy.status, HealthStatus::Healthy);

        let unhealthy = HealthResponse::new(HealthStatus::Unhealthy);
        assert_eq!(unhealthy.status, HealthStatus::Unhealthy);
    }

    #[test]
    fn test_health_status_serializes_lowercase() {
        let json = serde_json::to_string(&HealthStatus::Healthy).unwrap();
        assert_eq!(json, "\"healthy\"");
    }

    #[test]
    fn test_trace_event_optional_fields_deserialize() {
        let event: TraceEvent = serde_json::from_str(r#"{"name":"prompt_sent"}"#).unwrap();
        assert_eq!(event.name, "prompt_sent");
        assert!(event.id.is_none());
        assert!(event.at.is_none());
        assert!(event.attributes.is_none());
    }
}
