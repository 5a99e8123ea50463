//! Error types for input validation and service calls

use reqwest::StatusCode;
use thiserror::Error;

/// Rejected user input. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("title is empty")]
    EmptyTitle,
}

/// Failure of a single request to the content service.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    Url(String),

    #[error("response exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}
