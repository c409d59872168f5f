//! Mock implementations for testing.
//!
//! In-memory implementations of the domain traits, configurable to simulate
//! success and failure scenarios, with call recording for assertions.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::{
    AppError, CompletionOutcome, CompletionUsage, CryptoError, EngineClient, EngineError,
    MessageCipher, SamplingOptions,
};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
        }
    }
}

/// Mock engine client with whitespace-word tokenization.
///
/// `tokenize` yields one id per whitespace-separated word, `embed` returns a
/// fixed-dimension vector, and every call is recorded for assertions.
pub struct MockEngineClient {
    config: MockConfig,
    embed_calls: Mutex<Vec<String>>,
    complete_calls: Mutex<Vec<(String, SamplingOptions)>>,
}

impl MockEngineClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            embed_calls: Mutex::new(Vec::new()),
            complete_calls: Mutex::new(Vec::new()),
        }
    }

    fn fail_if_configured(&self) -> Result<(), AppError> {
        if self.config.should_fail {
            let message = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "mock failure".to_string());
            return Err(EngineError::Connection(message).into());
        }
        Ok(())
    }

    /// Inputs passed to `embed`, in call order.
    pub fn embed_calls(&self) -> Vec<String> {
        self.embed_calls.lock().unwrap().clone()
    }

    /// Prompts and options passed to `complete`, in call order.
    pub fn complete_calls(&self) -> Vec<(String, SamplingOptions)> {
        self.complete_calls.lock().unwrap().clone()
    }
}

impl Default for MockEngineClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EngineClient for MockEngineClient {
    async fn health_check(&self) -> Result<(), AppError> {
        self.fail_if_configured()
    }

    async fn complete(
        &self,
        prompt: &str,
        options: &SamplingOptions,
    ) -> Result<CompletionOutcome, AppError> {
        self.fail_if_configured()?;
        self.complete_calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), options.clone()));

        Ok(CompletionOutcome {
            text: format!("echo: {prompt}"),
            usage: CompletionUsage {
                prompt_tokens: prompt.split_whitespace().count() as u32,
                completion_tokens: 2,
            },
        })
    }

    async fn embed(&self, input: &str) -> Result<Vec<f32>, AppError> {
        self.fail_if_configured()?;
        self.embed_calls.lock().unwrap().push(input.to_string());
        Ok(vec![0.1, 0.2, 0.3, 0.4])
    }

    async fn tokenize(&self, input: &str) -> Result<Vec<u32>, AppError> {
        self.fail_if_configured()?;
        Ok((0..input.split_whitespace().count() as u32).collect())
    }

    async fn detokenize(&self, tokens: &[u32]) -> Result<String, AppError> {
        self.fail_if_configured()?;
        Ok(tokens
            .iter()
            .map(|t| format!("tok{t}"))
            .collect::<Vec<_>>()
            .join(" "))
    }
}

/// Mock cipher with a reversible, non-cryptographic envelope.
///
/// `seal` prefixes the plaintext; `open` strips the prefix and fails with a
/// decrypt error on anything else, mimicking the real cipher's behavior
/// without key files.
pub struct MockCipher {
    config: MockConfig,
}

const MOCK_ENVELOPE_PREFIX: &str = "sealed:";

impl MockCipher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: MockConfig::success(),
        }
    }

    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            config: MockConfig::failure(message),
        }
    }
}

impl Default for MockCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageCipher for MockCipher {
    fn seal(&self, plaintext: &str) -> Result<String, CryptoError> {
        if self.config.should_fail {
            return Err(CryptoError::Encrypt(
                self.config
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "mock failure".to_string()),
            ));
        }
        Ok(format!("{MOCK_ENVELOPE_PREFIX}{plaintext}"))
    }

    fn open(&self, ciphertext: &str) -> Result<String, CryptoError> {
        if self.config.should_fail {
            return Err(CryptoError::Decrypt(
                self.config
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "mock failure".to_string()),
            ));
        }
        ciphertext
            .strip_prefix(MOCK_ENVELOPE_PREFIX)
            .map(str::to_string)
            .ok_or_else(|| CryptoError::Decrypt("not a mock envelope".to_string()))
    }

    fn max_plaintext_len(&self) -> Result<usize, CryptoError> {
        Ok(190)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_engine_records_calls() {
        let engine = MockEngineClient::new();
        engine.embed("hello").await.unwrap();
        engine
            .complete("prompt", &SamplingOptions::default())
            .await
            .unwrap();

        assert_eq!(engine.embed_calls(), vec!["hello".to_string()]);
        assert_eq!(engine.complete_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_engine_failure_mode() {
        let engine = MockEngineClient::failing("down");
        let err = engine.embed("hello").await.unwrap_err();
        assert!(matches!(err, AppError::Engine(EngineError::Connection(msg)) if msg == "down"));
        assert!(engine.embed_calls().is_empty());
    }

    #[tokio::test]
    async fn test_mock_tokenizer_is_word_based() {
        let engine = MockEngineClient::new();
        let tokens = engine.tokenize("a b c").await.unwrap();
        assert_eq!(tokens.len(), 3);

        let text = engine.detokenize(&tokens).await.unwrap();
        assert_eq!(text.split_whitespace().count(), 3);
    }

    #[test]
    fn test_mock_cipher_round_trip() {
        let cipher = MockCipher::new();
        let sealed = cipher.seal("payload").unwrap();
        assert_eq!(cipher.open(&sealed).unwrap(), "payload");
    }

    #[test]
    fn test_mock_cipher_rejects_foreign_input() {
        let cipher = MockCipher::new();
        assert!(matches!(
            cipher.open("garbage").unwrap_err(),
            CryptoError::Decrypt(_)
        ));
    }
}
