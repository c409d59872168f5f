//! Application service layer.
//!
//! Orchestrates the gateway operations: validates requests, opens sealed
//! payload fields through the message cipher, forwards work to the upstream
//! engine client, and records metrics. No inference happens here.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{
    AppError, CompletionRequest, CompletionResponse, DecodeRequest, DecodeResponse,
    EmbeddingRequest, EmbeddingResponse, EncodeRequest, EncodeResponse, EngineClient,
    HealthResponse, HealthStatus, MessageCipher, SamplingOptions, TokenCountRequest,
    TokenCountResponse, TraceIngestRequest, TraceIngestResponse, UploadDatasetRequest,
    UploadDatasetResponse, ValidationError,
};

/// Gateway service holding the trait seams for the engine and the cipher.
pub struct GatewayService {
    engine: Arc<dyn EngineClient>,
    cipher: Arc<dyn MessageCipher>,
}

impl GatewayService {
    #[must_use]
    pub fn new(engine: Arc<dyn EngineClient>, cipher: Arc<dyn MessageCipher>) -> Self {
        Self { engine, cipher }
    }

    /// Resolve a plaintext-or-sealed field pair into plaintext.
    ///
    /// Exactly one of the two must be present; a sealed value is opened
    /// through the cipher, so envelope failures surface as crypto errors.
    fn resolve_text(
        &self,
        plain: Option<&str>,
        sealed: Option<&str>,
        field: &str,
    ) -> Result<String, AppError> {
        match (plain, sealed) {
            (Some(text), None) => Ok(text.to_string()),
            (None, Some(ciphertext)) => Ok(self.cipher.open(ciphertext)?),
            (Some(_), Some(_)) => Err(ValidationError::InvalidField {
                field: field.to_string(),
                message: "plaintext and sealed variants are mutually exclusive".to_string(),
            }
            .into()),
            (None, None) => Err(ValidationError::MissingField(field.to_string()).into()),
        }
    }

    /// Compute an embedding for a single input.
    #[instrument(skip(self, request))]
    pub async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse, AppError> {
        request.validate()?;
        let input = self.resolve_text(
            request.input.as_deref(),
            request.sealed_input.as_deref(),
            "input",
        )?;

        let embedding = self.engine.embed(&input).await?;
        metrics::counter!("gateway_requests_total", "operation" => "embedding").increment(1);

        Ok(EmbeddingResponse {
            dimension: embedding.len(),
            embedding,
        })
    }

    /// Embed every row of an uploaded dataset.
    #[instrument(skip(self, request), fields(dataset = %request.name))]
    pub async fn upload_dataset(
        &self,
        request: &UploadDatasetRequest,
    ) -> Result<UploadDatasetResponse, AppError> {
        request.validate()?;
        info!(rows = request.rows.len(), "Embedding dataset");

        let mut dimension = 0;
        for row in &request.rows {
            let embedding = self.engine.embed(&row.text).await?;
            if dimension == 0 {
                dimension = embedding.len();
            }
        }
        metrics::counter!("gateway_requests_total", "operation" => "dataset").increment(1);

        Ok(UploadDatasetResponse {
            name: request.name.clone(),
            rows: request.rows.len(),
            dimension,
        })
    }

    /// Run a text completion.
    #[instrument(skip(self, request))]
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, AppError> {
        request.validate()?;
        let prompt = self.resolve_text(
            request.prompt.as_deref(),
            request.sealed_prompt.as_deref(),
            "prompt",
        )?;

        let options = SamplingOptions {
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };
        let outcome = self.engine.complete(&prompt, &options).await?;
        metrics::counter!("gateway_requests_total", "operation" => "completion").increment(1);

        Ok(CompletionResponse {
            id: Uuid::new_v4(),
            text: outcome.text,
            usage: outcome.usage,
        })
    }

    /// Count tokens in the input via the upstream tokenizer.
    #[instrument(skip(self, request))]
    pub async fn count_tokens(
        &self,
        request: &TokenCountRequest,
    ) -> Result<TokenCountResponse, AppError> {
        request.validate()?;
        let tokens = self.engine.tokenize(&request.input).await?;
        metrics::counter!("gateway_requests_total", "operation" => "token_count").increment(1);
        Ok(TokenCountResponse {
            count: tokens.len(),
        })
    }

    /// Encode text into token ids.
    #[instrument(skip(self, request))]
    pub async fn encode(&self, request: &EncodeRequest) -> Result<EncodeResponse, AppError> {
        request.validate()?;
        let tokens = self.engine.tokenize(&request.input).await?;
        metrics::counter!("gateway_requests_total", "operation" => "encode").increment(1);
        Ok(EncodeResponse { tokens })
    }

    /// Decode token ids back into text.
    #[instrument(skip(self, request))]
    pub async fn decode(&self, request: &DecodeRequest) -> Result<DecodeResponse, AppError> {
        request.validate()?;
        let text = self.engine.detokenize(&request.tokens).await?;
        metrics::counter!("gateway_requests_total", "operation" => "decode").increment(1);
        Ok(DecodeResponse { text })
    }

    /// Log a batch of client trace events.
    #[instrument(skip(self, request))]
    pub fn ingest_traces(
        &self,
        request: &TraceIngestRequest,
    ) -> Result<TraceIngestResponse, AppError> {
        request.validate()?;
        for event in &request.events {
            info!(
                target: "client_trace",
                event_id = ?event.id,
                event_name = %event.name,
                at = ?event.at,
                attributes = ?event.attributes,
                "Client trace event"
            );
        }
        metrics::counter!("gateway_trace_events_total")
            .increment(request.events.len() as u64);

        Ok(TraceIngestResponse {
            accepted: request.events.len(),
        })
    }

    /// Check the upstream engine and report overall health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> HealthResponse {
        let engine = match self.engine.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = ?e, "Engine health check failed");
                HealthStatus::Unhealthy
            }
        };
        HealthResponse::new(engine)
    }
}
