//! Application error types with proper error chaining.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CryptoError {
    #[error("Key file unreadable at '{path}': {message}")]
    KeyUnavailable { path: String, message: String },
    #[error("Key material invalid: {0}")]
    InvalidKey(String),
    #[error("Encryption failed: {0}")]
    Encrypt(String),
    #[error("Decryption failed: {0}")]
    Decrypt(String),
    #[error("Ciphertext is not valid base64: {0}")]
    InvalidCiphertext(String),
    #[error("Plaintext of {len} bytes exceeds the OAEP limit of {max} bytes")]
    PayloadTooLarge { len: usize, max: usize },
    #[error("Decrypted payload is not valid UTF-8: {0}")]
    InvalidPlaintext(String),
}

#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Engine returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Engine response malformed: {0}")]
    Decode(String),
    #[error("Timeout waiting for engine: {0}")]
    Timeout(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<&str> for ConfigError {
    fn from(s: &str) -> Self {
        ConfigError::ParseError(s.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Validation failed: {0}")]
    Multiple(String),
}

impl From<&str> for ValidationError {
    fn from(s: &str) -> Self {
        ValidationError::InvalidFormat(s.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Rate limit exceeded")]
    RateLimited,
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(ValidationError::Multiple(err.to_string()))
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EngineError::Timeout(err.to_string())
        } else if err.is_connect() {
            EngineError::Connection(err.to_string())
        } else if err.is_decode() {
            EngineError::Decode(err.to_string())
        } else {
            EngineError::Connection(err.to_string())
        }
    }
}
