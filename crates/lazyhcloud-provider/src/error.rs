//! Error types for resource providers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to reach the cloud API: {0}")]
    ConnectionError(String),

    #[error("API error ({status}): {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Failed to decode API response: {0}")]
    DecodeError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::DecodeError(e.to_string())
        } else {
            Self::ConnectionError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        Self::DecodeError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
