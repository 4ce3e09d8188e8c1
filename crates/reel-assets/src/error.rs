//! Error types for asset generation.

use thiserror::Error;

/// Result type for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;

/// Errors raised by asset client implementations.
///
/// All variants represent upstream-caused failures; the pipeline maps
/// them to a per-scene `AssetGenerationFailed` cause.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("upstream returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    #[error("upstream returned malformed audio: {0}")]
    MalformedAudio(String),

    #[error("upstream returned malformed image: {0}")]
    MalformedImage(String),

    #[error("client misconfigured: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssetError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn malformed_audio(message: impl Into<String>) -> Self {
        Self::MalformedAudio(message.into())
    }

    pub fn malformed_image(message: impl Into<String>) -> Self {
        Self::MalformedImage(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether another attempt against the upstream could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AssetError::Timeout(_) | AssetError::Request(_) => true,
            AssetError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
