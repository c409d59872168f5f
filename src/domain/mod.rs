//! Domain layer containing core business types, traits, and error definitions.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{AppError, ConfigError, CryptoError, EngineError, ValidationError};
pub use traits::{CompletionOutcome, EngineClient, MessageCipher};
pub use types::{
    CompletionRequest, CompletionResponse, CompletionUsage, DatasetRow, DecodeRequest,
    DecodeResponse, EmbeddingRequest, EmbeddingResponse, EncodeRequest, EncodeResponse,
    ErrorDetail, ErrorResponse, HealthResponse, HealthStatus, RateLimitResponse, SamplingOptions,
    TokenCountRequest, TokenCountResponse, TraceEvent, TraceIngestRequest, TraceIngestResponse,
    UploadDatasetRequest, UploadDatasetResponse,
};
