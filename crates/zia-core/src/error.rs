use core::result::Result as CoreResult;

use reqwest::Error as ReqwestError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors raised by handlers, oracles, and core conversions.
#[derive(Debug, Error)]
pub enum Error {
    /// An HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] SerdeJsonError),

    /// A capability handler could not complete its task.
    #[error("Handler error: {0}")]
    Handler(String),

    /// The oracle could not produce a response.
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// Required API key was not found.
    #[error("API key not found: {0}")]
    MissingApiKey(String),

    /// A remote service returned a response that could not be used.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A string did not name a known capability.
    #[error("Unknown capability: {0}")]
    UnknownCapability(String),

    /// A general error not covered by other variants.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Determines whether this error may succeed if retried.
    ///
    /// Nothing in the orchestrator retries; callers wrapping it can use this
    /// to decide on their own policy.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Oracle(_))
    }
}
