use thiserror::Error;
use threadline_api::ApiError;

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("No conversation is open")]
    NoConversationOpen,

    #[error("Request superseded by a newer one")]
    Superseded,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
