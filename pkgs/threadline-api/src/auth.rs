//! Bearer token providers

use crate::error::ApiError;

/// Pluggable token provider, asked before every request.
///
/// Returns `Ok(None)` to send the request without an Authorization header.
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<Option<String>, ApiError>;
}

/// Anonymous requests
pub struct NoAuth;

#[async_trait::async_trait]
impl TokenSource for NoAuth {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(None)
    }
}

/// Token obtained outside the client (login screen, env var)
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait::async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        if self.0.trim().is_empty() {
            return Err(ApiError::Auth("empty access token".to_string()));
        }
        Ok(Some(self.0.clone()))
    }
}
