//! In-memory message store used by the client tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use threadline_api::{ApiError, MessageApi};
use threadline_messaging::{ClientConfig, MessagingClient, MessagingEvent};
use threadline_store::{
    Conversation, ConversationId, Filter, LastMessage, Message, MessageId, Participant, Sender,
    UserId, UserType,
};
use tokio::sync::mpsc::UnboundedReceiver;

pub const ME: UserId = 1;

struct FakeState {
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    next_message_id: MessageId,
    clock: DateTime<Utc>,
    failing: HashSet<String>,
    delays: HashMap<ConversationId, Duration>,
    send_delay: Option<Duration>,
    calls: HashMap<String, usize>,
}

pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                conversations: Vec::new(),
                messages: Vec::new(),
                next_message_id: 100,
                clock: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
                failing: HashSet::new(),
                delays: HashMap::new(),
                send_delay: None,
                calls: HashMap::new(),
            }),
        }
    }

    /// Add a conversation between the local user and `other`
    pub fn add_conversation(&self, id: ConversationId, other: UserId, name: &str) {
        let mut state = self.state.lock();
        let created_at = state.clock;
        state.conversations.push(Conversation {
            id,
            participants: vec![
                Participant {
                    id: ME,
                    name: "me".to_string(),
                    user_type: UserType::Client,
                },
                Participant {
                    id: other,
                    name: name.to_string(),
                    user_type: UserType::Professional,
                },
            ],
            is_archived: false,
            is_hidden: false,
            created_at,
            last_message: None,
            unread_count: 0,
        });
    }

    /// A message arriving from the other participant
    pub fn receive(&self, conversation: ConversationId, content: &str) -> MessageId {
        let sender = {
            let state = self.state.lock();
            let conv = state
                .conversations
                .iter()
                .find(|c| c.id == conversation)
                .expect("unknown conversation");
            let other = conv
                .participants
                .iter()
                .find(|p| p.id != ME)
                .expect("no other participant");
            Sender {
                id: other.id,
                name: other.name.clone(),
            }
        };
        self.push_message(conversation, sender, content)
    }

    /// A message the local user sent from another device
    pub fn seed_own(&self, conversation: ConversationId, content: &str) -> MessageId {
        self.push_message(conversation, me(), content)
    }

    pub fn fail(&self, op: &str) {
        self.state.lock().failing.insert(op.to_string());
    }

    pub fn recover(&self, op: &str) {
        self.state.lock().failing.remove(op);
    }

    pub fn delay_messages(&self, conversation: ConversationId, delay: Duration) {
        self.state.lock().delays.insert(conversation, delay);
    }

    /// Hold the send response back after the message is stored
    pub fn delay_send(&self, delay: Duration) {
        self.state.lock().send_delay = Some(delay);
    }

    pub fn calls(&self, op: &str) -> usize {
        self.state.lock().calls.get(op).copied().unwrap_or(0)
    }

    pub fn message_count(&self, conversation: ConversationId) -> usize {
        self.state
            .lock()
            .messages
            .iter()
            .filter(|m| m.conversation == conversation)
            .count()
    }

    pub fn is_archived(&self, conversation: ConversationId) -> bool {
        self.state
            .lock()
            .conversations
            .iter()
            .any(|c| c.id == conversation && c.is_archived)
    }

    fn push_message(
        &self,
        conversation: ConversationId,
        sender: Sender,
        content: &str,
    ) -> MessageId {
        let mut state = self.state.lock();
        state.next_message_id += 1;
        state.clock = state.clock + chrono::Duration::minutes(1);
        let message = Message {
            id: state.next_message_id,
            conversation,
            sender,
            content: content.to_string(),
            created_at: state.clock,
            is_read: false,
            is_edited: false,
        };
        let id = message.id;
        state.messages.push(message);
        id
    }

    fn enter(&self, op: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        *state.calls.entry(op.to_string()).or_default() += 1;
        if state.failing.contains(op) {
            return Err(ApiError::Server {
                status: 500,
                message: format!("{op} unavailable"),
            });
        }
        Ok(())
    }

    fn snapshot(state: &FakeState, conversation: &Conversation) -> Conversation {
        let mut snapshot = conversation.clone();
        let messages = state
            .messages
            .iter()
            .filter(|m| m.conversation == conversation.id);
        snapshot.last_message = messages
            .clone()
            .max_by_key(|m| m.created_at)
            .map(|m| LastMessage {
                id: m.id,
                sender: m.sender.clone(),
                content: m.content.clone(),
                created_at: m.created_at,
            });
        snapshot.unread_count = messages.filter(|m| !m.is_read && m.sender.id != ME).count() as u32;
        snapshot
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::Server {
            status: 404,
            message: format!("{what} not found"),
        }
    }
}

pub fn me() -> Sender {
    Sender {
        id: ME,
        name: "me".to_string(),
    }
}

#[async_trait]
impl MessageApi for FakeApi {
    async fn list_conversations(&self, filter: Filter) -> Result<Vec<Conversation>, ApiError> {
        self.enter(&format!("list:{filter}"))?;
        let state = self.state.lock();
        let mut list: Vec<Conversation> = state
            .conversations
            .iter()
            .map(|c| Self::snapshot(&state, c))
            .filter(|c| filter.matches(c))
            .collect();
        list.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));
        Ok(list)
    }

    async fn get_conversation(&self, id: ConversationId) -> Result<Conversation, ApiError> {
        self.enter("get_conversation")?;
        let state = self.state.lock();
        state
            .conversations
            .iter()
            .find(|c| c.id == id)
            .map(|c| Self::snapshot(&state, c))
            .ok_or_else(|| Self::not_found("Conversation"))
    }

    async fn list_messages(&self, conversation: ConversationId) -> Result<Vec<Message>, ApiError> {
        self.enter("list_messages")?;
        let delay = self.state.lock().delays.get(&conversation).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.state.lock();
        let mut messages: Vec<Message> = state
            .messages
            .iter()
            .filter(|m| m.conversation == conversation)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    async fn search_messages(&self, term: &str) -> Result<Vec<Message>, ApiError> {
        self.enter("search")?;
        let needle = term.to_lowercase();
        let state = self.state.lock();
        Ok(state
            .messages
            .iter()
            .filter(|m| m.content.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn send_message(
        &self,
        conversation: ConversationId,
        content: &str,
    ) -> Result<Message, ApiError> {
        self.enter("send")?;
        let id = self.push_message(conversation, me(), content);
        let delay = self.state.lock().send_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let state = self.state.lock();
        state
            .messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("Message"))
    }

    async fn edit_message(&self, id: MessageId, content: &str) -> Result<Message, ApiError> {
        self.enter("edit")?;
        let mut state = self.state.lock();
        let message = state
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| Self::not_found("Message"))?;
        message.content = content.to_string();
        message.is_edited = true;
        Ok(message.clone())
    }

    async fn delete_message(&self, id: MessageId) -> Result<(), ApiError> {
        self.enter("delete_message")?;
        let mut state = self.state.lock();
        let before = state.messages.len();
        state.messages.retain(|m| m.id != id);
        if state.messages.len() == before {
            return Err(Self::not_found("Message"));
        }
        Ok(())
    }

    async fn mark_conversation_read(&self, conversation: ConversationId) -> Result<(), ApiError> {
        self.enter("mark_read")?;
        let mut state = self.state.lock();
        for message in state
            .messages
            .iter_mut()
            .filter(|m| m.conversation == conversation && m.sender.id != ME)
        {
            message.is_read = true;
        }
        Ok(())
    }

    async fn archive_conversation(&self, id: ConversationId) -> Result<(), ApiError> {
        self.enter("archive")?;
        self.set_flag(id, |c| c.is_archived = true)
    }

    async fn unarchive_conversation(&self, id: ConversationId) -> Result<(), ApiError> {
        self.enter("unarchive")?;
        self.set_flag(id, |c| c.is_archived = false)
    }

    async fn hide_conversation(&self, id: ConversationId) -> Result<(), ApiError> {
        self.enter("hide")?;
        self.set_flag(id, |c| c.is_hidden = true)
    }
}

impl FakeApi {
    pub fn set_flag(
        &self,
        id: ConversationId,
        f: impl FnOnce(&mut Conversation),
    ) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        let conversation = state
            .conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Self::not_found("Conversation"))?;
        f(conversation);
        Ok(())
    }
}

/// Store with three conversations:
/// 1 (alice, two unread incoming), 2 (bob, one own message), 3 (carol, archived)
pub fn seeded() -> Arc<FakeApi> {
    let api = Arc::new(FakeApi::new());
    api.add_conversation(1, 10, "alice");
    api.add_conversation(2, 20, "bob");
    api.add_conversation(3, 30, "carol");
    api.receive(1, "Is the jacket still available?");
    api.receive(1, "I can pick it up tomorrow");
    api.seed_own(2, "Hello Bob");
    api.receive(3, "Thanks for the order");
    api.set_flag(3, |c| c.is_archived = true)
        .expect("seeded conversation");
    api
}

pub fn test_config() -> ClientConfig {
    ClientConfig {
        local_user_id: ME,
        ..ClientConfig::default()
    }
}

/// A client over a fresh fake store
pub fn client_with(api: Arc<FakeApi>) -> (MessagingClient, UnboundedReceiver<MessagingEvent>) {
    MessagingClient::new(api, test_config())
}

/// Every event received so far
pub fn drain(events: &mut UnboundedReceiver<MessagingEvent>) -> Vec<MessagingEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}
