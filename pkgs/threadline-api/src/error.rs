//! Error types for API calls

use thiserror::Error;

/// Errors returned by the remote message store
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },
    #[error("{0}")]
    Rejected(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Auth error: {0}")]
    Auth(String),
    #[error("Response carried no data")]
    MissingData,
}

impl ApiError {
    /// Failures worth retrying by hand (connectivity, 5xx)
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
