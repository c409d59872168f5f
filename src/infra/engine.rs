//! HTTP client for the upstream inference engine.
//!
//! Speaks the llama.cpp server wire format: `/completion`, `/embedding`,
//! `/tokenize`, `/detokenize`, `/health`. The gateway forwards work here and
//! never computes anything itself.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::{
    AppError, CompletionOutcome, CompletionUsage, EngineClient, EngineError, SamplingOptions,
};

/// Connection settings for [`HttpEngineClient`].
#[derive(Debug, Clone)]
pub struct EngineClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl EngineClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Reqwest-backed [`EngineClient`].
pub struct HttpEngineClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpEngineClient {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        Self::with_config(EngineClientConfig::new(base_url))
    }

    pub fn with_config(config: EngineClientConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, AppError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(EngineError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        response
            .json::<R>()
            .await
            .map_err(|e| EngineError::Decode(e.to_string()).into())
    }
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    n_predict: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct CompletionReply {
    content: String,
    #[serde(default)]
    tokens_evaluated: u32,
    #[serde(default)]
    tokens_predicted: u32,
}

#[derive(Serialize)]
struct ContentBody<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingReply {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct TokensBody<'a> {
    tokens: &'a [u32],
}

#[derive(Deserialize)]
struct TokenizeReply {
    tokens: Vec<u32>,
}

#[derive(Deserialize)]
struct DetokenizeReply {
    content: String,
}

#[async_trait]
impl EngineClient for HttpEngineClient {
    async fn health_check(&self) -> Result<(), AppError> {
        let response = self
            .http
            .get(self.url("/health"))
            .send()
            .await
            .map_err(EngineError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }
        Ok(())
    }

    async fn complete(
        &self,
        prompt: &str,
        options: &SamplingOptions,
    ) -> Result<CompletionOutcome, AppError> {
        let reply: CompletionReply = self
            .post_json(
                "/completion",
                &CompletionBody {
                    prompt,
                    n_predict: options.max_tokens,
                    temperature: options.temperature,
                },
            )
            .await?;

        Ok(CompletionOutcome {
            text: reply.content,
            usage: CompletionUsage {
                prompt_tokens: reply.tokens_evaluated,
                completion_tokens: reply.tokens_predicted,
            },
        })
    }

    async fn embed(&self, input: &str) -> Result<Vec<f32>, AppError> {
        let reply: EmbeddingReply = self
            .post_json("/embedding", &ContentBody { content: input })
            .await?;
        Ok(reply.embedding)
    }

    async fn tokenize(&self, input: &str) -> Result<Vec<u32>, AppError> {
        let reply: TokenizeReply = self
            .post_json("/tokenize", &ContentBody { content: input })
            .await?;
        Ok(reply.tokens)
    }

    async fn detokenize(&self, tokens: &[u32]) -> Result<String, AppError> {
        let reply: DetokenizeReply = self.post_json("/detokenize", &TokensBody { tokens }).await?;
        Ok(reply.content)
    }
}
