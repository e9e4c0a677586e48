//! Threadline API - client for the remote message store
//!
//! The remote store owns the durable truth about conversations and messages.
//! [`MessageApi`] is the seam the messaging client talks through;
//! [`HttpMessageApi`] implements it over the REST endpoints, unwrapping the
//! `{status, message, error, data}` envelope every endpoint returns.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use threadline_api::{HttpMessageApi, MessageApi, StaticToken};
//! use threadline_store::Filter;
//!
//! # async fn example() -> Result<(), threadline_api::ApiError> {
//! let api = HttpMessageApi::new(
//!     "http://localhost:8000/api",
//!     Arc::new(StaticToken::new("jwt")),
//!     Duration::from_secs(30),
//! )?;
//! let unread = api.list_conversations(Filter::Unread).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod envelope;
pub mod error;
pub mod http;

pub use auth::{NoAuth, StaticToken, TokenSource};
pub use envelope::{ApiEnvelope, ListPayload};
pub use error::ApiError;
pub use http::{filter_query, HttpMessageApi};

use threadline_store::{Conversation, ConversationId, Filter, Message, MessageId};

/// Operations the messaging client needs from the remote message store
#[async_trait::async_trait]
pub trait MessageApi: Send + Sync + 'static {
    /// `GET /conversations/` restricted to one partition
    async fn list_conversations(&self, filter: Filter) -> Result<Vec<Conversation>, ApiError>;

    /// `GET /conversations/{id}/`
    async fn get_conversation(&self, id: ConversationId) -> Result<Conversation, ApiError>;

    /// `GET /messages/?conversation={id}`
    async fn list_messages(&self, conversation: ConversationId) -> Result<Vec<Message>, ApiError>;

    /// `GET /messages/?search={term}` across all conversations
    async fn search_messages(&self, term: &str) -> Result<Vec<Message>, ApiError>;

    async fn send_message(
        &self,
        conversation: ConversationId,
        content: &str,
    ) -> Result<Message, ApiError>;

    async fn edit_message(&self, id: MessageId, content: &str) -> Result<Message, ApiError>;

    async fn delete_message(&self, id: MessageId) -> Result<(), ApiError>;

    async fn mark_conversation_read(&self, conversation: ConversationId) -> Result<(), ApiError>;

    async fn archive_conversation(&self, id: ConversationId) -> Result<(), ApiError>;

    async fn unarchive_conversation(&self, id: ConversationId) -> Result<(), ApiError>;

    /// Soft delete: the conversation disappears from every partition
    async fn hide_conversation(&self, id: ConversationId) -> Result<(), ApiError>;
}
