//! Error types for the capture-and-delivery pipeline.
//!
//! None of these ever reach a capture producer. They are absorbed inside the
//! queue and transport, logged, and turned into "keep the entry" or "drop it".

use thiserror::Error;

/// One failed delivery attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection refused, DNS failure, timeout
    #[error("network error: {0}")]
    Network(String),

    /// Endpoint answered with a non-2xx status
    #[error("endpoint returned status {0}")]
    Status(u16),

    /// 2xx, but the body was not JSON
    #[error("malformed acknowledgment: {0}")]
    MalformedAck(String),

    /// The envelope could not be encoded. Retrying will not help.
    #[error("payload serialization failed: {0}")]
    Serialization(String),
}

impl TransportError {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TransportError::Serialization(_))
    }
}

/// Session-scoped or durable storage failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Storage inaccessible (quota, private browsing, read-only disk)
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Stored value exists but cannot be decoded
    #[error("stored value is corrupt: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Umbrella error for the pipeline surface.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("transport failure: {0}")]
    TransportFailure(#[from] TransportError),

    #[error("serialization failure: {0}")]
    SerializationFailure(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
