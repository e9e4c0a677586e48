//! Conversation and message records as served by the marketplace API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ConversationId = u64;
pub type MessageId = u64;
pub type UserId = u64;

/// Marketplace role of a participant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Professional,
    Client,
    Admin,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A member of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: UserId,
    #[serde(alias = "username")]
    pub name: String,
    #[serde(default)]
    pub user_type: UserType,
}

/// Author of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub id: UserId,
    #[serde(alias = "username")]
    pub name: String,
}

/// Snapshot of the newest message, embedded in conversation summaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Conversation summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_message: Option<LastMessage>,
    #[serde(default)]
    pub unread_count: u32,
}

impl Conversation {
    /// The participant that is not the local user
    pub fn other_participant(&self, local_user: UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id != local_user)
    }

    /// Timestamp of the newest message, or creation time for an empty conversation
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_message
            .as_ref()
            .map(|m| m.created_at)
            .unwrap_or(self.created_at)
    }

    pub fn has_unread(&self) -> bool {
        self.unread_count > 0
    }
}

/// A single message of a thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation: ConversationId,
    pub sender: Sender,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_edited: bool,
}

impl Message {
    /// Build a thread entry from a conversation's last-message snapshot.
    pub fn from_snapshot(conversation: ConversationId, snapshot: &LastMessage) -> Self {
        Self {
            id: snapshot.id,
            conversation,
            sender: snapshot.sender.clone(),
            content: snapshot.content.clone(),
            created_at: snapshot.created_at,
            is_read: false,
            is_edited: false,
        }
    }

    /// Read flags only ever move from unread to read.
    pub fn mark_read(&mut self) {
        self.is_read = true;
    }

    pub fn is_from(&self, user: UserId) -> bool {
        self.sender.id == user
    }

    /// Apply an edit; sender and conversation are left untouched.
    pub fn apply(&mut self, patch: &MessagePatch) {
        self.content = patch.content.clone();
        self.is_edited = patch.is_edited;
    }
}

/// Editable part of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePatch {
    pub content: String,
    pub is_edited: bool,
}

impl MessagePatch {
    pub fn edited(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_edited: true,
        }
    }
}

impl From<&Message> for MessagePatch {
    fn from(message: &Message) -> Self {
        Self {
            content: message.content.clone(),
            is_edited: message.is_edited,
        }
    }
}
