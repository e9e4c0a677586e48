//! The `{status, message, error, data}` envelope wrapping every response

use serde::Deserialize;

use crate::error::ApiError;

/// Response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// A missing status defers to the HTTP status code.
    pub fn is_success(&self) -> bool {
        match self.status.as_deref() {
            None => true,
            Some(status) => matches!(
                status.to_ascii_lowercase().as_str(),
                "success" | "ok" | "200" | "201"
            ),
        }
    }

    /// Human-readable reason for a failed call
    pub fn reason(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "Request failed".to_string())
    }

    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.is_success() {
            return Err(ApiError::Rejected(self.reason()));
        }
        self.data.ok_or(ApiError::MissingData)
    }

    /// For endpoints whose payload is irrelevant
    pub fn into_unit(self) -> Result<(), ApiError> {
        if !self.is_success() {
            return Err(ApiError::Rejected(self.reason()));
        }
        Ok(())
    }
}

/// List payloads come either bare or wrapped in a paginated `results` object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListPayload<T> {
    Plain(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> ListPayload<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Plain(items) => items,
            ListPayload::Paged { results } => results,
        }
    }
}
