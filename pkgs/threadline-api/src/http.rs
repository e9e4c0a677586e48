//! reqwest-backed implementation of [`MessageApi`]

use std::sync::Arc;
use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use threadline_store::{Conversation, ConversationId, Filter, Message, MessageId};
use tracing::{debug, instrument};

use crate::auth::TokenSource;
use crate::envelope::{ApiEnvelope, ListPayload};
use crate::error::ApiError;
use crate::MessageApi;

/// Query string selecting one conversation partition
pub fn filter_query(filter: Filter) -> &'static [(&'static str, &'static str)] {
    match filter {
        Filter::All => &[("is_archived", "false"), ("is_hidden", "false")],
        Filter::Unread => &[
            ("has_unread", "true"),
            ("is_archived", "false"),
            ("is_hidden", "false"),
        ],
        Filter::Archived => &[("is_archived", "true"), ("is_hidden", "false")],
    }
}

/// HTTP client for the conversation and message endpoints
pub struct HttpMessageApi {
    http: reqwest::Client,
    base_url: String,
    token_source: Arc<dyn TokenSource>,
}

impl HttpMessageApi {
    pub fn new(
        base_url: impl Into<String>,
        token_source: Arc<dyn TokenSource>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url, token_source))
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        token_source: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_source,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path; paths keep their trailing slash.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self.token_source.token().await? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }

    /// Send a request and unwrap the envelope's `data`.
    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let resp = self.authed(builder).await?.send().await?;
        let body = Self::checked_body(resp).await?;
        let envelope: ApiEnvelope<T> = serde_json::from_str(&body)
            .map_err(|e| ApiError::Decode(format!("response body: {}", e)))?;
        envelope.into_data()
    }

    /// Send a request whose payload is not needed.
    async fn execute(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let resp = self.authed(builder).await?.send().await?;
        let body = Self::checked_body(resp).await?;
        if body.trim().is_empty() {
            return Ok(());
        }
        let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(&body)
            .map_err(|e| ApiError::Decode(format!("response body: {}", e)))?;
        envelope.into_unit()
    }

    /// Map non-2xx responses to [`ApiError::Server`], preferring the
    /// envelope's reason over the raw body.
    async fn checked_body(resp: Response) -> Result<String, ApiError> {
        let status = resp.status();
        let body = resp.text().await?;
        if status.is_success() {
            return Ok(body);
        }
        let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body)
            .map(|env| env.reason())
            .unwrap_or(body);
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait::async_trait]
impl MessageApi for HttpMessageApi {
    #[instrument(skip(self))]
    async fn list_conversations(&self, filter: Filter) -> Result<Vec<Conversation>, ApiError> {
        let req = self
            .http
            .get(self.url("conversations/"))
            .query(filter_query(filter));
        let list: ListPayload<Conversation> = self.fetch(req).await?;
        let list = list.into_vec();
        debug!("Fetched {} {} conversation(s)", list.len(), filter);
        Ok(list)
    }

    async fn get_conversation(&self, id: ConversationId) -> Result<Conversation, ApiError> {
        let req = self.http.get(self.url(&format!("conversations/{}/", id)));
        self.fetch(req).await
    }

    #[instrument(skip(self))]
    async fn list_messages(&self, conversation: ConversationId) -> Result<Vec<Message>, ApiError> {
        let req = self
            .http
            .get(self.url("messages/"))
            .query(&[("conversation", conversation)]);
        let list: ListPayload<Message> = self.fetch(req).await?;
        Ok(list.into_vec())
    }

    #[instrument(skip(self))]
    async fn search_messages(&self, term: &str) -> Result<Vec<Message>, ApiError> {
        let req = self
            .http
            .get(self.url("messages/"))
            .query(&[("search", term)]);
        let list: ListPayload<Message> = self.fetch(req).await?;
        Ok(list.into_vec())
    }

    async fn send_message(
        &self,
        conversation: ConversationId,
        content: &str,
    ) -> Result<Message, ApiError> {
        let req = self
            .http
            .post(self.url("messages/"))
            .json(&json!({ "conversation": conversation, "content": content }));
        self.fetch(req).await
    }

    async fn edit_message(&self, id: MessageId, content: &str) -> Result<Message, ApiError> {
        let req = self
            .http
            .patch(self.url(&format!("messages/{}/", id)))
            .json(&json!({ "content": content }));
        self.fetch(req).await
    }

    async fn delete_message(&self, id: MessageId) -> Result<(), ApiError> {
        let req = self.http.delete(self.url(&format!("messages/{}/", id)));
        self.execute(req).await
    }

    async fn mark_conversation_read(&self, conversation: ConversationId) -> Result<(), ApiError> {
        let req = self
            .http
            .post(self.url("messages/mark_conversation_as_read/"))
            .json(&json!({ "conversation_id": conversation }));
        self.execute(req).await
    }

    async fn archive_conversation(&self, id: ConversationId) -> Result<(), ApiError> {
        let req = self
            .http
            .post(self.url(&format!("conversations/{}/archive/", id)));
        self.execute(req).await
    }

    async fn unarchive_conversation(&self, id: ConversationId) -> Result<(), ApiError> {
        let req = self
            .http
            .post(self.url(&format!("conversations/{}/unarchive/", id)));
        self.execute(req).await
    }

    async fn hide_conversation(&self, id: ConversationId) -> Result<(), ApiError> {
        let req = self
            .http
            .post(self.url(&format!("conversations/{}/hide/", id)));
        self.execute(req).await
    }
}
