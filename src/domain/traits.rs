//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use super::error::{AppError, CryptoError};
use super::types::{CompletionUsage, SamplingOptions};

/// Raw outcome of an upstream completion call.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub text: String,
    pub usage: CompletionUsage,
}

/// Client for the upstream inference engine.
///
/// The gateway never runs inference itself; every operation is forwarded
/// through this trait. Implementations must be cheap to share behind `Arc`.
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// Check engine connectivity.
    async fn health_check(&self) -> Result<(), AppError>;

    /// Run a text completion.
    async fn complete(
        &self,
        prompt: &str,
        options: &SamplingOptions,
    ) -> Result<CompletionOutcome, AppError>;

    /// Compute an embedding vector for the input text.
    async fn embed(&self, input: &str) -> Result<Vec<f32>, AppError>;

    /// Encode text into token ids.
    async fn tokenize(&self, input: &str) -> Result<Vec<u32>, AppError>;

    /// Decode token ids back into text.
    async fn detokenize(&self, tokens: &[u32]) -> Result<String, AppError>;
}

/// Seal and open small payloads with the gateway key pair.
///
/// `seal` produces base64(RSA-OAEP(SHA-256, MGF1-SHA-256, utf8(plaintext)));
/// `open` is the inverse. Key material is read from disk on every call, so
/// the trait is synchronous and implementations carry no key state.
pub trait MessageCipher: Send + Sync {
    /// Encrypt a UTF-8 string, returning base64 ciphertext.
    fn seal(&self, plaintext: &str) -> Result<String, CryptoError>;

    /// Decrypt base64 ciphertext back into a UTF-8 string.
    fn open(&self, ciphertext: &str) -> Result<String, CryptoError>;

    /// Largest plaintext (in bytes) the configured public key can seal.
    fn max_plaintext_len(&self) -> Result<usize, CryptoError>;
}
